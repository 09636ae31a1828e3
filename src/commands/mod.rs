mod destination;
mod hotel;

pub use destination::DestinationCommand;
pub use hotel::HotelCommand;

use clap::ValueEnum;
use serde_json::{Map, Value};
use std::io::{self, Write};

use crate::client::ApiClient;
use crate::models::{NearbyAttraction, RoomType};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Checks that the server is up.
pub async fn health(client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let health = client.health().await?;
    println!(
        "{} at {}: {} (version {})",
        health.status,
        client.base_url(),
        health.message,
        health.version
    );
    Ok(())
}

/// Parses `key=value`. The value is read as JSON when it parses, otherwise
/// kept as a string, so `--field tags='["a","b"]'` and `--field note=hi`
/// both work.
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parses `name:price[:facility,facility,...]`.
pub fn parse_room(raw: &str) -> Result<RoomType, String> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    let price = parts
        .next()
        .ok_or_else(|| format!("expected name:price[:facilities], got '{}'", raw))?;
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| format!("invalid room price '{}'", price))?;
    let facilities = parts
        .next()
        .map(|list| {
            list.split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect()
        })
        .unwrap_or_default();
    Ok(RoomType::new(name, price).with_facilities(facilities))
}

/// Parses `name:distance`.
pub fn parse_attraction(raw: &str) -> Result<NearbyAttraction, String> {
    let (name, distance) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected name:distance, got '{}'", raw))?;
    Ok(NearbyAttraction::new(name.trim(), distance.trim()))
}

fn fields_map(fields: &[(String, Value)]) -> Map<String, Value> {
    fields.iter().cloned().collect()
}

/// Asks for confirmation on stdin. Anything but `y` declines.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
