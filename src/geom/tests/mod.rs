mod test_profile_basic;
mod test_project_basic;
mod test_revolve_basic;
