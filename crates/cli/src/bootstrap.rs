use {
    shelter_config::ShelterBotConfig, shelter_directory::InMemoryDirectory, tracing::info,
};

/// Seed the in-memory directory with configured shelters and volunteers.
pub fn directory(config: &ShelterBotConfig) -> InMemoryDirectory {
    let directory = InMemoryDirectory::new().with_shelters(config.shelters.iter().cloned());
    for volunteer in &config.volunteers {
        directory.add_volunteer(volunteer.chat_id, volunteer.name.clone());
    }
    info!(
        shelters = config.shelters.len(),
        volunteers = config.volunteers.len(),
        "directory seeded"
    );
    directory
}
