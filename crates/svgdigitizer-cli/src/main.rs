use serde::Serialize;
use std::io::{Read, Write};
use svgdigitizer_core::{
    Annotations, Axis, AxisTransform, CalibrationMode, Digitizer, DigitizerOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Digitizer(svgdigitizer_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Digitizer(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<svgdigitizer_core::Error> for CliError {
    fn from(value: svgdigitizer_core::Error) -> Self {
        Self::Digitizer(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Digitize,
    Calibrate,
    Curves,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    x_label: Option<String>,
    y_label: Option<String>,
    sampling_interval: Option<f64>,
    config: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferencePointOut<'a> {
    id: String,
    pixel: [f64; 2],
    value: f64,
    unit: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScaleBarOut<'a> {
    axis: Axis,
    pixel_length: f64,
    real_length: f64,
    unit: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformOut {
    mode: &'static str,
    slope: f64,
    pixel_anchor: f64,
    real_anchor: f64,
    scaling_factor: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalibrateOut<'a> {
    reference_points: Vec<ReferencePointOut<'a>>,
    scale_bars: Vec<ScaleBarOut<'a>>,
    x: TransformOut,
    y: TransformOut,
}

impl TransformOut {
    fn new(transform: &AxisTransform, annotations: &Annotations) -> Self {
        Self {
            mode: match transform.mode() {
                CalibrationMode::ReferencePoints => "referencePoints",
                CalibrationMode::ScaleBar => "scaleBar",
            },
            slope: transform.slope(),
            pixel_anchor: transform.pixel_anchor(),
            real_anchor: transform.real_anchor(),
            scaling_factor: annotations.scaling_factor(transform.axis()),
        }
    }
}

fn calibrate_out(digitizer: &Digitizer) -> CalibrateOut<'_> {
    let annotations = digitizer.annotations();
    let calibration = digitizer.calibration();
    CalibrateOut {
        reference_points: annotations
            .reference_points()
            .map(|p| ReferencePointOut {
                id: p.id(),
                pixel: [p.pixel_anchor.x, p.pixel_anchor.y],
                value: p.real_value,
                unit: p.unit.as_deref(),
            })
            .collect(),
        scale_bars: annotations
            .scale_bars()
            .map(|b| ScaleBarOut {
                axis: b.axis,
                pixel_length: b.pixel_length,
                real_length: b.real_length,
                unit: b.unit.as_deref(),
            })
            .collect(),
        x: TransformOut::new(&calibration.x, annotations),
        y: TransformOut::new(&calibration.y, annotations),
    }
}

fn usage() -> &'static str {
    "svgdigitizer-cli\n\
\n\
USAGE:\n\
  svgdigitizer-cli [digitize] [--xlabel <s>] [--ylabel <s>] [--sampling-interval <n>] [--config <path>] [--pretty] [--out <path>] [<path>|-]\n\
  svgdigitizer-cli calibrate [--pretty] [--out <path>] [<path>|-]\n\
  svgdigitizer-cli curves [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the SVG is read from stdin.\n\
  - digitize prints one JSON object per curve: {\"curve\", \"columns\", \"rows\"}.\n\
  - --config reads DigitizerOptions JSON (xlabel, ylabel, samplingInterval); flags override it.\n\
  - --sampling-interval is in real x units; without it the raw path vertices are emitted.\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) to trace annotation resolution on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "digitize" => args.command = Command::Digitize,
            "calibrate" => args.command = Command::Calibrate,
            "curves" => args.command = Command::Curves,
            "--pretty" => args.pretty = true,
            "--xlabel" => {
                let Some(label) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.x_label = Some(label.clone());
            }
            "--ylabel" => {
                let Some(label) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.y_label = Some(label.clone());
            }
            "--sampling-interval" => {
                let Some(interval) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let interval = interval
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(interval.is_finite() && interval > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.sampling_interval = Some(interval);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_options(args: &Args) -> Result<DigitizerOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<DigitizerOptions>(&std::fs::read_to_string(path)?)?,
        None => DigitizerOptions::default(),
    };
    if let Some(label) = &args.x_label {
        options.x_label = label.clone();
    }
    if let Some(label) = &args.y_label {
        options.y_label = label.clone();
    }
    if let Some(interval) = args.sampling_interval {
        options.sampling_interval = Some(interval);
    }
    Ok(options)
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    bytes.push(b'\n');
    match out {
        None => std::io::stdout().lock().write_all(&bytes)?,
        Some(path) => std::fs::write(path, bytes)?,
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let options = load_options(&args)?;
    let text = read_input(args.input.as_deref())?;
    let digitizer = Digitizer::from_svg(&text, options)?;

    match args.command {
        Command::Digitize => {
            let series = digitizer.data_series();
            tracing::info!(curves = series.len(), "digitized");
            write_json(&series, args.pretty, args.out.as_deref())
        }
        Command::Calibrate => write_json(&calibrate_out(&digitizer), args.pretty, args.out.as_deref()),
        Command::Curves => {
            let mut text = String::new();
            for id in digitizer.registry().ids() {
                text.push_str(id);
                text.push('\n');
            }
            write_text(&text, args.out.as_deref())
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
