use crate::model::{LeaveKind, LeaveRecord, ScheduledDay};
use crate::providers::{AdjustmentEvent, AdjustmentKind, EventLedger};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Import des congés: header `date,kind,deductible`
pub fn import_leaves_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<BTreeMap<NaiveDate, LeaveRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = BTreeMap::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = parse_date(rec.get(0).context("missing date")?)?;
        let kind: LeaveKind = rec
            .get(1)
            .context("missing kind")?
            .parse()
            .with_context(|| format!("invalid leave kind on {date}"))?;
        let deductible = match rec.get(2).map(str::trim) {
            Some(flag) if !flag.is_empty() => parse_bool(flag)
                .with_context(|| format!("invalid deductible value on {date}"))?,
            _ => true,
        };
        out.insert(date, LeaveRecord::new(kind, deductible));
    }
    Ok(out)
}

/// Import des ajustements: header `date,kind,minutes` (kind: lateness|early_leave|overtime)
pub fn import_adjustments_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<EventLedger> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut ledger = EventLedger::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = parse_date(rec.get(0).context("missing date")?)?;
        let kind: AdjustmentKind = rec
            .get(1)
            .context("missing kind")?
            .parse()
            .with_context(|| format!("invalid adjustment kind on {date}"))?;
        let minutes: u32 = rec
            .get(2)
            .context("missing minutes")?
            .trim()
            .parse()
            .with_context(|| format!("invalid minutes on {date}"))?;
        ledger.record(AdjustmentEvent { date, kind, minutes });
    }
    Ok(ledger)
}

/// Import des jours fériés: header `date[,name]`
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<BTreeSet<NaiveDate>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = BTreeSet::new();
    for rec in rdr.records() {
        let rec = rec?;
        out.insert(parse_date(rec.get(0).context("missing date")?)?);
    }
    Ok(out)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {raw}"))
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export CSV de la frise: header `date,phase,start,end` (instants RFC3339, vides pour un repos)
pub fn export_timeline_csv<P: AsRef<Path>>(
    path: P,
    schedule: &[ScheduledDay],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "phase", "start", "end"])?;
    for day in schedule {
        let interval = day.interval.as_ref();
        let date = day.item.date.to_string();
        let start = interval.map(|i| i.start.to_rfc3339()).unwrap_or_default();
        let end = interval.map(|i| i.end.to_rfc3339()).unwrap_or_default();
        w.write_record([
            date.as_str(),
            day.item.phase.as_str(),
            start.as_str(),
            end.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
