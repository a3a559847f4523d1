use agil_core::TopicName;

use crate::error::CliError;

pub fn run_topic(city: &str, state: Option<&str>, country: Option<&str>) -> Result<(), CliError> {
    let topic = topic_for(city, state, country)?;
    println!("{topic}");
    Ok(())
}

pub fn topic_for(
    city: &str,
    state: Option<&str>,
    country: Option<&str>,
) -> Result<TopicName, CliError> {
    TopicName::new(city, state, country).ok_or_else(|| CliError::InvalidCity(city.to_string()))
}
