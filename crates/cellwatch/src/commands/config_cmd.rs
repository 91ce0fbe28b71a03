//! `cellwatch config`: manage the configuration file.

use cellwatch_config::{config_path, load_config_or_default, write_default_config};

use crate::cli::{ConfigAction, ConfigArgs, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Path => {
            println!("{}", config_path().display());
            Ok(())
        }

        ConfigAction::Init => {
            let path = config_path();
            if write_default_config(&path).map_err(CliError::from)? {
                println!("wrote {}", path.display());
            } else {
                println!("{} already exists", path.display());
            }
            Ok(())
        }

        ConfigAction::Show => {
            let config = load_config_or_default();
            let profile = config.resolve_profile(global.profile.as_deref())?;
            let monitor = config.to_monitor_config(&profile)?;

            println!("port:          {}", monitor.port);
            println!("https:         {}", monitor.https);
            println!("health path:   {}", monitor.health_path);
            println!("interval:      {:?}", monitor.interval);
            println!("device id:     {}", monitor.device_id);
            println!("device model:  {}", monitor.device_model);
            println!("priority:      {}", monitor.priority_hosts.join(", "));
            Ok(())
        }
    }
}
