// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `grievance list`: fetch and print every grievance from the server.

use colored::Colorize;
use grievance_client::HttpPortalClient;
use grievance_config::GrievanceConfig;
use grievance_core::{GrievanceError, GrievanceRecord};

pub async fn run_list(config: GrievanceConfig, json: bool) -> Result<(), GrievanceError> {
    let client = HttpPortalClient::new(&config.portal.server_url)?;
    let records = client.list().await?;

    if json {
        let body = serde_json::to_string_pretty(&records)
            .map_err(|e| GrievanceError::Internal(format!("failed to encode grievances: {e}")))?;
        println!("{body}");
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "no grievances yet".dimmed());
        return Ok(());
    }
    for record in &records {
        println!("{}", render(record));
    }
    Ok(())
}

fn render(record: &GrievanceRecord) -> String {
    let mut out = format!(
        "{} {}\n  {}",
        record.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        record.title.bold(),
        record.description
    );
    if let Some(mood) = &record.mood {
        out.push_str(&format!("\n  mood: {mood}"));
    }
    if let Some(severity) = &record.severity {
        out.push_str(&format!("\n  severity: {severity}"));
    }
    let geo = &record.geolocation;
    let location = match (&geo.latitude, &geo.longitude) {
        (Some(lat), Some(lon)) => format!("{lat}, {lon}"),
        _ => "unknown".to_string(),
    };
    out.push_str(&format!(
        "\n  from {} ({location})",
        record.ip_address
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use grievance_core::{Geolocation, NewGrievance};

    #[test]
    fn render_includes_optional_fields_only_when_present() {
        colored::control::set_override(false);
        let mut record = NewGrievance {
            title: "Noise".into(),
            description: "Too loud".into(),
            mood: None,
            severity: Some("Code Red! Major meltdown! 🌋".into()),
            ip_address: "198.51.100.7".into(),
            geolocation: Geolocation::default(),
        }
        .into_record();

        let text = render(&record);
        assert!(text.contains("Noise"));
        assert!(!text.contains("mood:"));
        assert!(text.contains("severity: Code Red!"));
        assert!(text.contains("from 198.51.100.7 (unknown)"));

        record.geolocation = Geolocation {
            latitude: Some("17.385".into()),
            longitude: Some("78.4867".into()),
        };
        assert!(render(&record).contains("(17.385, 78.4867)"));
    }
}
