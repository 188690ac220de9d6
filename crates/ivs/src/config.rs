//! Run configuration
//!
//! [`ReportSettings`] collects optional values from flags and environment
//! variables; [`ReportSettings::resolve`] validates them into an immutable
//! [`ReportConfig`] that is passed to [`crate::pipeline::run`].

use std::path::PathBuf;
use std::time::Duration;

use ivs_source::{ConnectionDescriptor, CsvSource, DbSource, RecordSource};

use crate::error::{Error, Result};
use crate::filter::{FilterCriteria, Preset};
use crate::normalize::{BlankCounting, BlankPartRule, ColumnMap};
use crate::period::ReportingPeriod;
use crate::report::ReportLayout;

/// Where raw records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Aggregation query against the inventory database
    Database {
        descriptor: ConnectionDescriptor,
        timeout: Duration,
    },
    /// Legacy fixed-layout CSV export
    Csv { path: PathBuf },
}

impl SourceConfig {
    /// Column layout of this source
    pub fn column_map(&self) -> ColumnMap {
        match self {
            SourceConfig::Database { .. } => ColumnMap::database(),
            SourceConfig::Csv { .. } => ColumnMap::legacy_csv(),
        }
    }

    /// Blank-part rule used when none is configured
    ///
    /// Query results carry no report footers, so nothing is truncated.
    pub fn default_blank_part_rule(&self) -> BlankPartRule {
        match self {
            SourceConfig::Database { .. } => BlankPartRule::disabled(),
            SourceConfig::Csv { .. } => BlankPartRule::default(),
        }
    }

    /// Open the record source
    pub fn open(&self) -> Box<dyn RecordSource> {
        match self {
            SourceConfig::Database {
                descriptor,
                timeout,
            } => Box::new(DbSource::new(descriptor.clone()).with_timeout(*timeout)),
            SourceConfig::Csv { path } => Box::new(CsvSource::new(path.clone())),
        }
    }
}

/// Validated configuration of one report run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub source: SourceConfig,
    /// Directory the report is written to
    pub output_dir: PathBuf,
    /// File name suffix after the period label
    pub report_name: String,
    pub filter: FilterCriteria,
    pub blank_part_rule: BlankPartRule,
    pub layout: ReportLayout,
}

impl ReportConfig {
    /// Report path for `period`: `{output_dir}/{label} {report_name}.xlsx`
    pub fn destination(&self, period: &ReportingPeriod) -> PathBuf {
        let mut file_name = format!("{} {}", period.label(), self.report_name);
        let has_extension = file_name
            .rsplit_once('.')
            .map_or(false, |(_, ext)| ext.eq_ignore_ascii_case("xlsx"));
        if !has_extension {
            file_name.push_str(".xlsx");
        }
        self.output_dir.join(file_name)
    }
}

/// Unvalidated settings, as gathered from the command line and environment
#[derive(Debug, Clone, Default)]
pub struct ReportSettings {
    pub host: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
    /// Read the legacy CSV export instead of the database
    pub csv_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub report_name: Option<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub preset: Option<Preset>,
    pub blank_part_limit: Option<usize>,
    pub consecutive_blanks: bool,
    pub no_truncate: bool,
}

impl ReportSettings {
    /// Validate into a [`ReportConfig`]
    pub fn resolve(self) -> Result<ReportConfig> {
        let output_dir = self
            .output_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| Error::config("output directory is not set (IVS_XLSX_DIR)"))?;
        let report_name = required(self.report_name, "report name (IVS_XLSX_FILE)")?;

        let source = match self.csv_file {
            Some(path) if !path.as_os_str().is_empty() => SourceConfig::Csv { path },
            _ => {
                let host = required(self.host, "database host (IVS_HOST)")?;
                let database = required(self.database, "database name (IVS_DATABASE)")?;
                let mut descriptor = ConnectionDescriptor::new(host, database);
                descriptor.user = self.user;
                descriptor.password = self.password;
                SourceConfig::Database {
                    descriptor,
                    timeout: self.timeout.unwrap_or(DbSource::DEFAULT_TIMEOUT),
                }
            }
        };

        let mut filter = FilterCriteria::new();
        for name in self.include {
            filter = filter.include(location_name(&name, "include")?);
        }
        for name in self.exclude {
            filter = filter.exclude(location_name(&name, "exclude")?);
        }
        if let Some(preset) = self.preset {
            filter = filter.merge(preset.criteria());
        }

        let base_rule = source.default_blank_part_rule();
        let blank_part_rule = if self.no_truncate {
            BlankPartRule::disabled()
        } else if self.blank_part_limit.is_some() || self.consecutive_blanks {
            let limit = self
                .blank_part_limit
                .or(base_rule.limit)
                .unwrap_or(BlankPartRule::DEFAULT_LIMIT);
            let counting = if self.consecutive_blanks {
                BlankCounting::Consecutive
            } else {
                BlankCounting::Cumulative
            };
            BlankPartRule::new(limit, counting)
        } else {
            base_rule
        };

        Ok(ReportConfig {
            source,
            output_dir,
            report_name,
            filter,
            blank_part_rule,
            layout: ReportLayout::default(),
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::config(format!("{} is not set", what))),
    }
}

fn location_name(name: &str, list: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::config(format!("empty location name in {} list", list)));
    }
    Ok(trimmed.to_string())
}
