//! World population service
//!
//! Builds a World -> region -> country tree from two World Bank documents.
//! Both documents are JSON arrays of the form `[metadata, [record, ...]]`.
//!
//! Population records look like
//! `{"country": {"id": "CA", "value": "Canada"}, "value": 38005238, ...}`;
//! region records look like
//! `{"name": "Canada", "region": {"id": "NAC", "value": "North America"}, ...}`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::{TreeVariant, WeightedTree};
use crate::infrastructure::traits::FileSystem;

/// Label of the population tree's root.
pub const WORLD_LABEL: &str = "World";

/// Region id the World Bank uses for aggregates ("Euro area", "High income", ...).
const AGGREGATE_REGION_ID: &str = "NA";

#[derive(Debug, Deserialize)]
struct Labelled {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PopulationRecord {
    country: Labelled,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    name: String,
    region: Labelled,
}

/// Countries grouped by region, regions in first-seen order.
pub type RegionTable = Vec<(String, Vec<String>)>;

/// Service for loading population datasets.
pub struct PopulationService {
    fs: Arc<dyn FileSystem>,
}

impl PopulationService {
    /// Create a new population service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load both documents and build the population tree.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, populations: &Path, regions: &Path) -> ApplicationResult<WeightedTree> {
        let populations = self.population_data(populations)?;
        let regions = self.region_data(regions)?;
        build_population_tree(&populations, &regions)
    }

    /// Country name -> population.
    ///
    /// Records without a country name or without an integer population are
    /// skipped. A later record for the same country wins.
    pub fn population_data(&self, path: &Path) -> ApplicationResult<HashMap<String, u64>> {
        let records: Vec<PopulationRecord> = self.read_records(path)?;
        let mut countries = HashMap::new();
        for record in records {
            let (Some(name), Some(population)) = (record.country.value, record.value.as_u64())
            else {
                continue;
            };
            countries.insert(name, population);
        }
        debug!("{} countries with population data", countries.len());
        Ok(countries)
    }

    /// Region name -> country names, aggregates excluded.
    pub fn region_data(&self, path: &Path) -> ApplicationResult<RegionTable> {
        let records: Vec<CountryRecord> = self.read_records(path)?;
        let mut regions: RegionTable = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for record in records {
            if record.region.id.as_deref() == Some(AGGREGATE_REGION_ID) {
                continue;
            }
            let Some(region) = record.region.value else {
                continue;
            };
            match positions.get(&region) {
                Some(&pos) => regions[pos].1.push(record.name),
                None => {
                    positions.insert(region.clone(), regions.len());
                    regions.push((region, vec![record.name]));
                }
            }
        }
        debug!("{} regions", regions.len());
        Ok(regions)
    }

    /// Read `[metadata, [record, ...]]`, skipping records that do not match `T`.
    fn read_records<T: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<Vec<T>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read dataset", path)?;
        let (_, raw): (IgnoredAny, Vec<serde_json::Value>) =
            serde_json::from_str(&content).with_dataset(path)?;

        let total = raw.len();
        let records: Vec<T> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if records.len() < total {
            debug!(
                "{}: skipped {} malformed records",
                path.display(),
                total - records.len()
            );
        }
        Ok(records)
    }
}

/// Build World -> region -> country.
///
/// Countries without population data are left out, and so are regions that
/// end up with no countries.
pub fn build_population_tree(
    populations: &HashMap<String, u64>,
    regions: &RegionTable,
) -> ApplicationResult<WeightedTree> {
    let mut tree = WeightedTree::new(TreeVariant::Population);
    let mut region_nodes = Vec::new();

    for (region, countries) in regions {
        let children: Vec<_> = countries
            .iter()
            .filter_map(|country| {
                populations
                    .get(country)
                    .map(|&population| tree.add_leaf(country.as_str(), population))
            })
            .collect();
        if children.is_empty() {
            debug!("dropping region without countries: {}", region);
            continue;
        }
        region_nodes.push(tree.add_node(region.as_str(), children, 0)?);
    }

    tree.add_node(WORLD_LABEL, region_nodes, 0)?;
    Ok(tree)
}
