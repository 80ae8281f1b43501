use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};

use crate::application::ExportFormat;
use crate::domain::query::Query;
use crate::infrastructure::normalize::parse_date;

#[derive(Parser, Debug)]
#[command(
    name = "violation-query",
    version,
    about = "Search published labor-law and environmental violation records"
)]
pub struct Cli {
    /// TOML file layered over the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Case-insensitive substring of the company name
    #[arg(long)]
    pub company: Option<String>,

    /// Exact authority name
    #[arg(long)]
    pub authority: Option<String>,

    /// Exact dataset tag, e.g. 勞動基準法
    #[arg(long)]
    pub dataset: Option<String>,

    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Drop the default date window
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["start", "end"])]
    pub all_dates: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Export the whole result set
    #[arg(long, value_enum)]
    pub export: Option<ExportArg>,

    /// Directory export files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Print the available authorities and dataset tags, then exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub list_facets: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportArg {
    Csv,
    Xls,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Xls => ExportFormat::Xls,
        }
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("unrecognized date: {}", value))
}

impl Cli {
    /// Query for these arguments. Without explicit bounds the default
    /// window ending `today` applies.
    pub fn query(&self, today: NaiveDate, default_days: u32) -> Query {
        let mut query = if self.all_dates {
            Query::new()
        } else if self.start.is_some() || self.end.is_some() {
            Query::new().with_date_range(self.start, self.end)
        } else {
            Query::default_window(today, default_days)
        };

        if let Some(company) = &self.company {
            query = query.with_company_name(company.as_str());
        }
        if let Some(authority) = &self.authority {
            query = query.with_authority(authority.as_str());
        }
        if let Some(dataset) = &self.dataset {
            query = query.with_dataset_tag(dataset.as_str());
        }
        query
    }
}
