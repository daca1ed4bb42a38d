#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        eprintln!("morph_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use revolve_engine::anim::{MorphDriver, RenderOptions, RevealMode};
    use revolve_engine::export::{
        frame_snapshot, frame_to_svg, mesh_snapshot, normalize_snapshot_text, profile_snapshot,
        write_obj,
    };
    use revolve_engine::geom::{
        PARAMETER_RANGES, ProfilePreset, RevolveOptions, ShapeParameters, generate_with_diagnostics,
        revolve_with_options,
    };
    use revolve_engine::parse::select_layer;
    use revolve_engine::sample::random_shape;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"morph_cli (revolve-engine)

USAGE:
  morph_cli presets
  morph_cli params   [shape options]
  morph_cli profile  [shape options] [--snap <path>]
  morph_cli mesh     [shape options] [--slices <n>] [--obj <path>] [--snap <path>]
  morph_cli frames   [shape options] [render options] --out-dir <dir>

SHAPE OPTIONS:
  --length <v> --girth <v> --curve <v> --base-angle <v> --glans-angle <v>
  --shaft-expansion <v> --glans-expansion <v>
                     Override single parameters (defaults: 140 140 10 10 0 100 100)
  --preset <name>    Apply a profile preset (see `presets`)
  --layer <text>     Read parameters and line style from a layer string
  --layer-index <n>  Layer to use from --layer (default 0)
  --random           Draw random parameters
  --seed <n>         Seed for --random (default 0)

RENDER OPTIONS (frames):
  --frames-per-phase <n>  Frames per camera phase (default 50)
  --size <px>             Output width/height in pixels (default 640)
  --reveal <mode>         off | compress | blend (default compress)
  --line-color <RRGGBB>   Stroke color
  --frame <n>             Write only this frame
  --snap                  Also write a snapshot per frame

COMMON:
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "presets" => {
                for preset in ProfilePreset::ALL {
                    println!("{}", preset.name());
                }
                Ok(())
            }
            "params" => cmd_params(&mut args),
            "profile" => cmd_profile(&mut args),
            "mesh" => cmd_mesh(&mut args),
            "frames" => cmd_frames(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Options
    // ─────────────────────────────────────────────────────────────────────────

    #[derive(Debug, Default)]
    struct CliOptions {
        overrides: Vec<(usize, f64)>,
        preset: Option<ProfilePreset>,
        layer: Option<String>,
        layer_index: usize,
        random: bool,
        seed: u64,
        slices: Option<usize>,
        frames_per_phase: Option<usize>,
        size: Option<u32>,
        reveal: Option<RevealMode>,
        line_color: Option<String>,
        frame: Option<usize>,
        out_dir: Option<PathBuf>,
        obj_path: Option<PathBuf>,
        snap_path: Option<PathBuf>,
        snap: bool,
        overwrite: bool,
    }

    /// Flag → parameter slot.
    const PARAMETER_FLAGS: [(&str, usize); 7] = [
        ("--length", 0),
        ("--girth", 1),
        ("--curve", 2),
        ("--base-angle", 3),
        ("--glans-angle", 4),
        ("--shaft-expansion", 5),
        ("--glans-expansion", 6),
    ];

    fn parse_options(args: &mut Args) -> Result<Option<CliOptions>, String> {
        let mut opts = CliOptions::default();
        while let Some(arg) = args.next() {
            if let Some((flag, slot)) = PARAMETER_FLAGS.iter().find(|(flag, _)| *flag == arg) {
                let value = parse_number::<f64>(flag, &args.value(flag)?)?;
                opts.overrides.push((*slot, value));
                continue;
            }
            match arg.as_str() {
                "--preset" => {
                    let name = args.value("--preset")?;
                    let preset = ProfilePreset::from_name(&name)
                        .ok_or_else(|| format!("unknown preset `{name}`"))?;
                    opts.preset = Some(preset);
                }
                "--layer" => opts.layer = Some(args.value("--layer")?),
                "--layer-index" => {
                    opts.layer_index = parse_number("--layer-index", &args.value("--layer-index")?)?;
                }
                "--random" => opts.random = true,
                "--seed" => opts.seed = parse_number("--seed", &args.value("--seed")?)?,
                "--slices" => opts.slices = Some(parse_number("--slices", &args.value("--slices")?)?),
                "--frames-per-phase" => {
                    let value = args.value("--frames-per-phase")?;
                    opts.frames_per_phase = Some(parse_number("--frames-per-phase", &value)?);
                }
                "--size" => opts.size = Some(parse_number("--size", &args.value("--size")?)?),
                "--reveal" => {
                    let name = args.value("--reveal")?;
                    let mode = RevealMode::from_name(&name)
                        .ok_or_else(|| format!("unknown reveal mode `{name}`"))?;
                    opts.reveal = Some(mode);
                }
                "--line-color" => opts.line_color = Some(args.value("--line-color")?),
                "--frame" => opts.frame = Some(parse_number("--frame", &args.value("--frame")?)?),
                "--out-dir" => opts.out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => opts.obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => {
                    // `--snap <path>` for profile/mesh, bare `--snap` for frames.
                    match args.peek() {
                        Some(next) if !next.starts_with("--") => {
                            opts.snap_path = Some(PathBuf::from(args.value("--snap")?));
                        }
                        _ => opts.snap = true,
                    }
                }
                "--overwrite" => opts.overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(None);
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }
        if opts.random && opts.layer.is_some() {
            return Err("use either --random or --layer (not both)".to_string());
        }
        Ok(Some(opts))
    }

    fn parse_number<T: std::str::FromStr>(flag: &str, text: &str) -> Result<T, String> {
        text.trim()
            .parse()
            .map_err(|_| format!("invalid value `{text}` for {flag}"))
    }

    impl CliOptions {
        /// Shape parameters and render options after layer, random draw,
        /// overrides and preset have been applied in that order.
        fn resolve(&self) -> Result<(ShapeParameters, RenderOptions), String> {
            let (mut params, mut render) = if let Some(layer) = self.layer.as_deref() {
                let layer = select_layer(layer, self.layer_index).map_err(|e| e.to_string())?;
                let render = layer.render_options(RenderOptions::default());
                (layer.params, render)
            } else if self.random {
                let shape = random_shape(self.seed);
                let render = RenderOptions {
                    line_color: shape.line_color.to_owned(),
                    ..RenderOptions::default()
                };
                (shape.params, render)
            } else {
                (ShapeParameters::default(), RenderOptions::default())
            };

            if !self.overrides.is_empty() {
                let mut slots = params.to_slots();
                for (slot, value) in &self.overrides {
                    slots[*slot] = *value;
                }
                params = ShapeParameters::from_slots(slots);
            }
            if let Some(preset) = self.preset {
                params = preset.apply(&params);
            }

            if let Some(slices) = self.slices {
                render.slices = slices;
            }
            if let Some(frames) = self.frames_per_phase {
                render.frames_per_phase = frames;
            }
            if let Some(size) = self.size {
                render.size = size;
            }
            if let Some(reveal) = self.reveal {
                render.reveal = reveal;
            }
            if let Some(color) = self.line_color.as_ref() {
                render.line_color.clone_from(color);
            }

            params.validate().map_err(|e| e.to_string())?;
            Ok((params, render))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    fn cmd_params(args: &mut Args) -> Result<(), String> {
        let Some(opts) = parse_options(args)? else {
            return Ok(());
        };
        let (params, _) = opts.resolve()?;
        for line in params.description_lines() {
            println!("{line}");
        }
        println!();
        for (range, value) in PARAMETER_RANGES.iter().zip(params.to_slots()) {
            println!(
                "{:<3} {:<22} {:>8} [{} .. {}]",
                range.key, range.label, value, range.min, range.max
            );
        }
        Ok(())
    }

    fn cmd_profile(args: &mut Args) -> Result<(), String> {
        let Some(opts) = parse_options(args)? else {
            return Ok(());
        };
        let (params, _) = opts.resolve()?;
        let (polygon, diagnostics) = generate_with_diagnostics(&params);
        for warning in &diagnostics.warnings {
            eprintln!("warning: {warning}");
        }
        let text = profile_snapshot(&polygon, &diagnostics);
        match opts.snap_path.as_ref() {
            Some(path) => write_text_file(path, &text, opts.overwrite),
            None => {
                print!("{text}");
                Ok(())
            }
        }
    }

    fn cmd_mesh(args: &mut Args) -> Result<(), String> {
        let Some(opts) = parse_options(args)? else {
            return Ok(());
        };
        let (params, render) = opts.resolve()?;
        let (polygon, _) = generate_with_diagnostics(&params);
        let options = RevolveOptions {
            slices: render.slices,
            ..RevolveOptions::default()
        };
        let (mesh, diagnostics) = revolve_with_options(&polygon, options).map_err(|e| e.to_string())?;
        eprintln!("{diagnostics}");

        if let Some(path) = opts.obj_path.as_ref() {
            ensure_writable(path, opts.overwrite)?;
            let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
            let mut w = BufWriter::new(file);
            write_obj(&mut w, &mesh, "shape").map_err(|e| format!("write obj: {e}"))?;
        }

        let text = mesh_snapshot(&mesh, &diagnostics);
        match opts.snap_path.as_ref() {
            Some(path) => write_text_file(path, &text, opts.overwrite),
            None if opts.obj_path.is_none() => {
                print!("{text}");
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn cmd_frames(args: &mut Args) -> Result<(), String> {
        let Some(opts) = parse_options(args)? else {
            return Ok(());
        };
        let out_dir = opts.out_dir.clone().ok_or("frames requires --out-dir")?;
        let (params, render) = opts.resolve()?;
        let driver = MorphDriver::new(&params, render).map_err(|e| e.to_string())?;

        fs::create_dir_all(&out_dir).map_err(|e| format!("create out dir: {e}"))?;

        let frames = match opts.frame {
            Some(index) => vec![driver.frame_at(index)],
            None => driver.render_all(),
        };
        for frame in &frames {
            let stem = format!("frame_{:04}", frame.index);
            let svg = frame_to_svg(frame, driver.options());
            write_text_file(&out_dir.join(format!("{stem}.svg")), &svg, opts.overwrite)?;
            if opts.snap {
                let snap = frame_snapshot(frame);
                write_text_file(&out_dir.join(format!("{stem}.snap")), &snap, opts.overwrite)?;
            }
        }
        eprintln!("wrote {} frame(s) to {}", frames.len(), out_dir.display());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        ensure_writable(path, overwrite)?;
        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        w.write_all(normalize_snapshot_text(text).as_bytes())
            .map_err(|e| format!("write {}: {e}", path.display()))?;
        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn peek(&self) -> Option<&str> {
            self.args.get(self.pos).map(String::as_str)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
