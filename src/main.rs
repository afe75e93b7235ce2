use clap::{ Arg, App };

use std::error::Error;
use std::path::PathBuf;
use std::process;

use lpr_capture::{ Config, LprError, Outcome };


fn config_from_args() -> Result<Config, Box<dyn Error>> {
    let matches = App::new("lpr-capture")
                    .version("0.1.0")
                    .author("kingrong")
                    .about("Capture a frame from the camera and extract the number plate text in it")
                    .arg(Arg::with_name("device")
                        .long("device")
                        .takes_value(true)
                        .help("camera index, 0 by default"))
                    .arg(Arg::with_name("output")
                        .long("output")
                        .takes_value(true)
                        .help("where the captured frame is written"))
                    .get_matches();

    let mut config = Config::default();
    if let Some(device) = matches.value_of("device") {
        config.device_index = device.parse()?;
    }
    if let Some(output) = matches.value_of("output") {
        config.image_path = PathBuf::from(output);
    }
    Ok(config)
}

#[cfg(all(feature = "camera", feature = "window"))]
fn run(config: &Config) -> Result<Outcome, LprError> {
    use lpr_capture::camera::NokhwaCamera;
    use lpr_capture::display::SdlWindow;
    use std::io;

    // engine is loaded once, before the preview starts
    let recognizer = config.recognizer()?;
    let mut camera = NokhwaCamera::new(config.device_index);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    config.capture_loop(&recognizer).run(&mut camera, || SdlWindow::open(&config.window_title), &mut out)
}

#[cfg(not(all(feature = "camera", feature = "window")))]
fn run(_config: &Config) -> Result<Outcome, LprError> {
    println!("Error: Unable to access the camera");
    Err(LprError::device_unavailable("built without the `camera` and `window` features"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match config_from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    log::debug!("running with {:?}", config);
    log::info!("preprocessing {}, engine {}", config.preprocess, config.engine);

    match run(&config) {
        Ok(Outcome::Recognized { text, .. }) => log::info!("recognized {:?}", text),
        Ok(Outcome::Cancelled) => log::info!("cancelled by user"),
        Err(e) => {
            // device errors were already reported on stdout
            if !e.is_device_failure() {
                eprintln!("{}", e);
            }
            process::exit(1);
        }
    }
}
