use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tracing::{debug, warn};

use super::utils::typed_column;
use crate::schema::{
    build_arrow_schema,
    tables::{PIVOT_COMMUNITY_COLUMNS, PIVOT_TRENDS_COLUMNS},
};

/// Doses summed for one (name, population) group.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityTotal {
    pub name: String,
    pub population: i64,
    pub total_doses: i64,
}

impl CommunityTotal {
    /// Percentage of the population vaccinated. Not rounded; non-finite when
    /// the population is zero.
    pub fn vaccination_rate(&self) -> f64 {
        self.total_doses as f64 / self.population as f64 * 100.0
    }
}

/// Group enriched records by (name, population), keeping groups in the order
/// they first appear. Rows without a name or population are not grouped.
pub fn community_totals(enriched: &RecordBatch) -> Result<Vec<CommunityTotal>> {
    let names = typed_column::<StringArray>(enriched, "name")?;
    let populations = typed_column::<Int64Array>(enriched, "population")?;
    let doses = typed_column::<Int64Array>(enriched, "doses_administered")?;

    let mut groups: Vec<CommunityTotal> = Vec::new();
    let mut index: HashMap<(String, i64), usize> = HashMap::new();
    let mut ungrouped = 0usize;

    for ((name, population), dose) in names.iter().zip(populations.iter()).zip(doses.iter()) {
        let (Some(name), Some(population)) = (name, population) else {
            ungrouped += 1;
            continue;
        };
        let dose = dose.unwrap_or(0);
        let key = (name.to_string(), population);
        match index.get(&key) {
            Some(&i) => groups[i].total_doses += dose,
            None => {
                index.insert(key, groups.len());
                groups.push(CommunityTotal {
                    name: name.to_string(),
                    population,
                    total_doses: dose,
                });
            }
        }
    }

    if ungrouped > 0 {
        warn!(ungrouped, "records without community key left out of community pivot");
    }
    Ok(groups)
}

/// Sum doses per `YYYY-MM` month key, ascending by month.
pub fn monthly_totals(enriched: &RecordBatch) -> Result<BTreeMap<String, i64>> {
    let months = typed_column::<StringArray>(enriched, "month")?;
    let doses = typed_column::<Int64Array>(enriched, "doses_administered")?;

    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for (month, dose) in months.iter().zip(doses.iter()) {
        if let Some(month) = month {
            *totals.entry(month.to_string()).or_insert(0) += dose.unwrap_or(0);
        }
    }
    Ok(totals)
}

/// `Pivot_Community`: name, population, total_doses, vaccination_rate(%).
#[tracing::instrument(level = "info", skip_all)]
pub fn pivot_by_community(enriched: &RecordBatch) -> Result<RecordBatch> {
    let groups = community_totals(enriched)?;
    debug!(groups = groups.len(), "community pivot");

    let names: StringArray = groups.iter().map(|g| Some(g.name.as_str())).collect();
    let populations: Int64Array = groups.iter().map(|g| Some(g.population)).collect();
    let totals: Int64Array = groups.iter().map(|g| Some(g.total_doses)).collect();
    let rates: Float64Array = groups.iter().map(|g| Some(g.vaccination_rate())).collect();

    RecordBatch::try_new(
        build_arrow_schema(PIVOT_COMMUNITY_COLUMNS),
        vec![
            Arc::new(names) as ArrayRef,
            Arc::new(populations) as ArrayRef,
            Arc::new(totals) as ArrayRef,
            Arc::new(rates) as ArrayRef,
        ],
    )
    .context("building community pivot")
}

/// `Pivot_Trends`: month, total_doses.
#[tracing::instrument(level = "info", skip_all)]
pub fn pivot_by_month(enriched: &RecordBatch) -> Result<RecordBatch> {
    let totals = monthly_totals(enriched)?;
    debug!(months = totals.len(), "monthly pivot");

    let months: StringArray = totals.keys().map(|m| Some(m.as_str())).collect();
    let doses: Int64Array = totals.values().map(|d| Some(*d)).collect();

    RecordBatch::try_new(
        build_arrow_schema(PIVOT_TRENDS_COLUMNS),
        vec![Arc::new(months) as ArrayRef, Arc::new(doses) as ArrayRef],
    )
    .context("building monthly pivot")
}
