use {anyhow::Result, shelter_config::ShelterBotConfig, shelter_telegram::TelegramConfig};

/// Print what the bot would run with, or fail on an unusable config.
pub fn check(config: &ShelterBotConfig) -> Result<()> {
    let telegram = TelegramConfig::from_value(config.telegram.clone())?;

    eprintln!("telegram: {telegram:?}");
    eprintln!("shelters: {}", config.shelters.len());
    for shelter in &config.shelters {
        eprintln!("  {} {}", shelter.id, shelter.name);
    }
    eprintln!("volunteers: {}", config.volunteers.len());
    if config.volunteers.is_empty() {
        eprintln!("  none: \"Ask a volunteer\" will always report that nobody is free");
    }
    eprintln!("No issues found.");
    Ok(())
}
