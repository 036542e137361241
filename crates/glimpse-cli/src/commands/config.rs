use anyhow::Result;
use colored::Colorize;
use glimpse_infrastructure::ConfigService;

pub fn show(service: &ConfigService) -> Result<()> {
    let config = service.get_config()?;
    println!("{}", format!("# {}", service.path().display()).bright_black());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn init(service: &ConfigService) -> Result<()> {
    if service.init()? {
        println!("{} {}", "Created".green(), service.path().display());
    } else {
        println!("{} {}", "Already exists:".yellow(), service.path().display());
    }
    Ok(())
}
