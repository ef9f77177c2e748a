//! bilcube command-line entry point.

use std::error::Error;
use std::path::{Path, PathBuf};

use argh::FromArgs;
use bilcube::export::{Summary, write_npy};
use bilcube::{ByteOrder, DecodeConfig, LogLevel, SampleFormat, synthetic};

#[derive(FromArgs, Debug)]
/// Decode Band-Interleaved-by-Line hyperspectral files
struct TopLevel {
    /// log verbosity: error, warn, info, debug, trace (overrides config)
    #[argh(option)]
    log_level: Option<LogLevel>,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Cube(CubeCmd),
    Band(BandCmd),
    Synth(SynthCmd),
}

#[derive(FromArgs, Debug)]
/// Decode the whole file into a rows x cols x bands cube
#[argh(subcommand, name = "cube")]
struct CubeCmd {
    /// input file in BIL layout
    #[argh(positional)]
    input: PathBuf,

    /// number of lines
    #[argh(option)]
    rows: Option<i64>,

    /// samples per band in each line
    #[argh(option)]
    cols: Option<i64>,

    /// number of bands
    #[argh(option)]
    bands: Option<i64>,

    /// path to a JSON decode config supplying omitted settings
    #[argh(option)]
    config: Option<PathBuf>,

    /// sample format: u8, u16, i16, u32, i32, f32, f64
    #[argh(option)]
    format: Option<SampleFormat>,

    /// samples are stored most significant byte first
    #[argh(switch)]
    big_endian: bool,

    /// skip the up-front file length check
    #[argh(switch)]
    lazy: bool,

    /// decode bands on parallel threads
    #[argh(switch)]
    parallel: bool,

    /// write the result to this .npy file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Decode a single band into a rows x cols image
#[argh(subcommand, name = "band")]
struct BandCmd {
    /// input file in BIL layout
    #[argh(positional)]
    input: PathBuf,

    /// one-based band to extract
    #[argh(option)]
    band: i64,

    /// number of lines
    #[argh(option)]
    rows: Option<i64>,

    /// samples per band in each line
    #[argh(option)]
    cols: Option<i64>,

    /// number of bands
    #[argh(option)]
    bands: Option<i64>,

    /// path to a JSON decode config supplying omitted settings
    #[argh(option)]
    config: Option<PathBuf>,

    /// sample format: u8, u16, i16, u32, i32, f32, f64
    #[argh(option)]
    format: Option<SampleFormat>,

    /// samples are stored most significant byte first
    #[argh(switch)]
    big_endian: bool,

    /// skip the up-front file length check
    #[argh(switch)]
    lazy: bool,

    /// write the result to this .npy file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Write a synthetic BIL file whose samples hold their own file position
#[argh(subcommand, name = "synth")]
struct SynthCmd {
    /// file to create
    #[argh(positional)]
    output: PathBuf,

    /// number of lines
    #[argh(option)]
    rows: i64,

    /// samples per band in each line
    #[argh(option)]
    cols: i64,

    /// number of bands
    #[argh(option)]
    bands: i64,

    /// sample format: u8, u16, i16, u32, i32, f32, f64
    #[argh(option, default = "SampleFormat::U16")]
    format: SampleFormat,

    /// store samples most significant byte first
    #[argh(switch)]
    big_endian: bool,

    /// also write a matching decode config to this path
    #[argh(option)]
    config: Option<PathBuf>,
}

/// Command-line settings layered over an optional config file.
struct Overrides<'a> {
    rows: Option<i64>,
    cols: Option<i64>,
    bands: Option<i64>,
    config: Option<&'a Path>,
    format: Option<SampleFormat>,
    big_endian: bool,
    lazy: bool,
}

impl Overrides<'_> {
    fn resolve(&self) -> Result<DecodeConfig, Box<dyn Error>> {
        let mut config = match self.config {
            Some(path) => DecodeConfig::load(path)?,
            None => {
                let (Some(rows), Some(cols), Some(bands)) = (self.rows, self.cols, self.bands)
                else {
                    return Err("--rows, --cols and --bands are required without --config".into());
                };
                DecodeConfig::new(rows, cols, bands)
            }
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(bands) = self.bands {
            config.bands = bands;
        }
        if let Some(format) = self.format {
            config.sample_format = format;
        }
        if self.big_endian {
            config.byte_order = ByteOrder::Big;
        }
        if self.lazy {
            config.eager_size_check = false;
        }
        Ok(config)
    }
}

fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_default_env()
        .init();
}

fn handle_cube_command(cmd: CubeCmd, log_level: Option<LogLevel>) -> Result<(), Box<dyn Error>> {
    let config = Overrides {
        rows: cmd.rows,
        cols: cmd.cols,
        bands: cmd.bands,
        config: cmd.config.as_deref(),
        format: cmd.format,
        big_endian: cmd.big_endian,
        lazy: cmd.lazy,
    }
    .resolve()?;
    init_logging(log_level.unwrap_or(config.log_level));

    let layout = config.layout()?;
    let cube = if cmd.parallel {
        read_cube_parallel(&cmd.input, &layout, config.options())?
    } else {
        bilcube::read_cube(&cmd.input, &layout, config.options())?
    };

    match cmd.output {
        Some(path) => write_npy(path, &cube)?,
        None => println!("{}", Summary::of(&cube)),
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn read_cube_parallel(
    path: &Path,
    layout: &bilcube::Layout,
    options: bilcube::DecodeOptions,
) -> bilcube::Result<ndarray::Array3<f64>> {
    bilcube::read_cube_parallel(path, layout, options)
}

#[cfg(not(feature = "parallel"))]
fn read_cube_parallel(
    path: &Path,
    layout: &bilcube::Layout,
    options: bilcube::DecodeOptions,
) -> bilcube::Result<ndarray::Array3<f64>> {
    log::warn!("Built without the `parallel` feature; decoding sequentially");
    bilcube::read_cube(path, layout, options)
}

fn handle_band_command(cmd: BandCmd, log_level: Option<LogLevel>) -> Result<(), Box<dyn Error>> {
    let config = Overrides {
        rows: cmd.rows,
        cols: cmd.cols,
        bands: cmd.bands,
        config: cmd.config.as_deref(),
        format: cmd.format,
        big_endian: cmd.big_endian,
        lazy: cmd.lazy,
    }
    .resolve()?;
    init_logging(log_level.unwrap_or(config.log_level));

    let layout = config.layout()?;
    let slice = bilcube::read_band(&cmd.input, &layout, cmd.band, config.options())?;

    match cmd.output {
        Some(path) => write_npy(path, &slice)?,
        None => println!("{}", Summary::of(&slice)),
    }
    Ok(())
}

fn handle_synth_command(cmd: SynthCmd, log_level: Option<LogLevel>) -> Result<(), Box<dyn Error>> {
    let mut config = DecodeConfig::new(cmd.rows, cmd.cols, cmd.bands);
    config.sample_format = cmd.format;
    if cmd.big_endian {
        config.byte_order = ByteOrder::Big;
    }
    init_logging(log_level.unwrap_or(config.log_level));

    let layout = config.layout()?;
    let bytes = synthetic::generate_bil(&layout);
    std::fs::write(&cmd.output, &bytes)?;
    log::info!("Wrote {} bytes to {:?}", bytes.len(), cmd.output);

    if let Some(path) = cmd.config {
        config.save(path)?;
    }
    Ok(())
}

fn run(cli: TopLevel) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Cube(cmd) => handle_cube_command(cmd, cli.log_level)?,
        Commands::Band(cmd) => handle_band_command(cmd, cli.log_level)?,
        Commands::Synth(cmd) => handle_synth_command(cmd, cli.log_level)?,
    }

    Ok(())
}

fn main() {
    let cli: TopLevel = argh::from_env();

    if let Err(e) = run(cli) {
        eprintln!("bilcube error: {}", e);
        std::process::exit(1);
    }
}
