//! Daily aggregate subcommands.

use super::{print_json, CliResult, Session};
use clap::Args;
use streakline_core::parse_day;

#[derive(Args, Debug)]
pub struct DayArgs {
    /// Day to aggregate (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub day: Option<String>,
}

#[derive(Args, Debug)]
pub struct WeekArgs {
    /// Any day inside the week (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub anchor: Option<String>,
}

pub fn day(session: &Session, args: DayArgs) -> CliResult<()> {
    let day = match args.day.as_deref() {
        Some(value) => parse_day(value)?,
        None => session.today(),
    };
    let aggregate = session.calendar()?.day_aggregate(session.owner(), day)?;
    print_json(&aggregate)
}

pub fn week(session: &Session, args: WeekArgs) -> CliResult<()> {
    let anchor = args.anchor.as_deref().map(parse_day).transpose()?;
    let week = session.calendar()?.week_rings(session.owner(), anchor)?;
    print_json(&week)
}
