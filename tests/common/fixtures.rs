//! Test data
//!
//! Builds the programs seeded into test databases and the JSON bodies used
//! to create them through the API.

use program_catalog_server::program_store::{NewProgram, ProgramStore, SqliteProgramStore};
use serde_json::{json, Value};

pub fn program_json(title: &str, country: &str, year: i64) -> Value {
    json!({
        "title": title,
        "synopsis": format!("Synopsis of {}.", title),
        "poster": format!(
            "http://posters.example/{}.jpg",
            title.to_lowercase().replace(' ', "-")
        ),
        "country": country,
        "year": year,
    })
}

pub fn dune_json() -> Value {
    json!({
        "title": "Dune",
        "synopsis": "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset.",
        "poster": "http://posters.example/dune.jpg",
        "country": "US",
        "year": 1965,
        "category_id": 3,
    })
}

fn seeded_programs() -> Vec<NewProgram> {
    vec![
        NewProgram {
            title: "Dune".to_string(),
            synopsis: "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset.".to_string(),
            poster: "http://posters.example/dune.jpg".to_string(),
            country: "US".to_string(),
            year: 1965,
            category_id: Some(3),
        },
        NewProgram {
            title: "Amélie".to_string(),
            synopsis: "A shy waitress decides to change the lives of those around her.".to_string(),
            poster: "http://posters.example/amelie.jpg".to_string(),
            country: "France".to_string(),
            year: 2001,
            category_id: None,
        },
    ]
}

/// Inserts the seeded programs; ids follow insertion order starting at 1.
pub fn seed_programs(store: &SqliteProgramStore) -> anyhow::Result<()> {
    for program in seeded_programs() {
        store.create(&program)?;
    }
    Ok(())
}
