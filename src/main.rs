use std::path::PathBuf;

use clap::Parser;
use ledlink_lib::adapters::config_file;
use ledlink_lib::domain::ControllerConfig;

/// Serial LED controller with an HTTP control surface
#[derive(Parser, Debug)]
#[command(name = "ledlink", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port name (e.g. COM3, /dev/ttyUSB0)
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// HTTP listen address
    #[arg(long)]
    bind: Option<String>,

    /// Audit log file
    #[arg(long)]
    audit_log: Option<String>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

impl Cli {
    fn apply(&self, config: &mut ControllerConfig) {
        if let Some(port) = &self.port {
            config.serial_port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if let Some(path) = &self.audit_log {
            config.audit_log_path = path.clone();
        }
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("ledlink_lib=info,ledlink=info"),
    )
    .init();

    let cli = Cli::parse();

    let mut config = match config_file::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    cli.apply(&mut config);

    if cli.list_ports {
        match ledlink_lib::list_serial_ports(&config) {
            Ok(ports) if ports.is_empty() => println!("No serial ports found"),
            Ok(ports) => {
                for p in ports {
                    println!("{}\t{}", p.name, p.port_type);
                }
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!(
        "Starting ledlink on {} at {} baud",
        config.serial_port,
        config.baud_rate
    );
    if let Err(e) = ledlink_lib::run(config) {
        log::error!("Startup failed ({}): {e}", e.kind());
        eprintln!("{e}");
        std::process::exit(1);
    }
}
