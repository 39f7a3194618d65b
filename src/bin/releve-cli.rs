#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use releve::{
    calendar::LocaleCalendar,
    config::Profile,
    dst::{DstValidator, DST_FLAG_KEY},
    io,
    model::{DateRange, Phase, ShiftContext},
    providers::{EventLedger, NoHolidays},
    storage::{JsonFileStore, KeyValueStore},
    system::{phase_cycle, CalendarEnv, ShiftSystem, SystemId},
    tz_change::TimezoneChangeDetector,
    WorkDaysAggregator,
};
use std::collections::BTreeMap;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de roulements d'équipes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du profil
    #[arg(long, global = true, default_value = "profile.json")]
    profile: String,

    /// Fichier JSON d'état (fuseau mémorisé, drapeaux)
    #[arg(long, global = true, default_value = "state.json")]
    state: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les systèmes de roulement disponibles
    Systems,

    /// Créer le profil
    Init {
        #[arg(long)]
        system: SystemId,
        /// Date décrite par l'index d'ancrage (YYYY-MM-DD)
        #[arg(long)]
        reference_date: NaiveDate,
        /// Heure zéro des postes (HH:MM)
        #[arg(long, default_value = "07:00")]
        shift_start: String,
        #[arg(long)]
        setup_index: Option<i64>,
        #[arg(long)]
        start_phase: Option<Phase>,
        #[arg(long, default_value = "UTC")]
        timezone: String,
        #[arg(long, default_value_t = 0)]
        break_minutes: u32,
        /// Désactive la vérification des changements d'heure
        #[arg(long)]
        no_dst: bool,
    },

    /// Afficher (et exporter) la frise
    Timeline {
        /// Premier jour (défaut : aujourd'hui dans le fuseau du profil)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Nombre de jours (au plus dix ans)
        #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u32).range(1..=3660))]
        days: u32,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Bilan des jours et minutes travaillés
    Aggregate {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// CSV `date,kind,deductible`
        #[arg(long)]
        leaves: Option<String>,
        /// CSV `date,kind,minutes`
        #[arg(long)]
        adjustments: Option<String>,
        /// CSV `date[,name]`, ajouté aux fériés du profil
        #[arg(long)]
        holidays: Option<String>,
        /// Détail jour par jour
        #[arg(long)]
        detail: bool,
    },

    /// Vérifier une heure de poste locale face aux changements d'heure
    DstCheck {
        /// Heure locale `YYYY-MM-DDTHH:MM:SS`
        #[arg(long)]
        at: NaiveDateTime,
        /// Fuseau IANA (défaut : celui du profil)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Signaler un changement de fuseau depuis la dernière activation
    TzCheck {
        /// Fuseau IANA courant de l'appareil
        #[arg(long)]
        timezone: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Systems => {
            for id in SystemId::ALL {
                let cycle: Vec<&str> = phase_cycle(id).iter().map(|p| p.as_str()).collect();
                println!("{} | {} | {}", id, cycle.join(","), id.description());
            }
            0
        }
        Commands::Init {
            system,
            reference_date,
            shift_start,
            setup_index,
            start_phase,
            timezone,
            break_minutes,
            no_dst,
        } => {
            let shift_start = NaiveTime::parse_from_str(&shift_start, "%H:%M")
                .with_context(|| format!("invalid shift start: {shift_start}"))?;
            let mut context = ShiftContext::new(system, shift_start, reference_date)
                .with_break_minutes(break_minutes);
            context.setup_index = setup_index;
            context.start_phase = start_phase;
            if !system_is_anchorable(&context) {
                bail!(
                    "no usable anchor: give --setup-index or a --start-phase present in the cycle"
                );
            }
            let profile = Profile::new(context, timezone);
            profile.save(&cli.profile)?;

            let mut state = JsonFileStore::open(&cli.state)?;
            state.set_int(DST_FLAG_KEY, i64::from(!no_dst))?;
            println!("profile written to {}", cli.profile);
            0
        }
        Commands::Timeline { from, days, out_csv } => {
            let profile = Profile::load(&cli.profile)?;
            let calendar = profile.calendar()?;
            let env = profile.env(&calendar);
            let system = ShiftSystem::for_context(&profile.context);
            let start = from.unwrap_or_else(|| calendar.today());

            let schedule = system.schedule(&profile.context, &env, start, days);
            if let Some(path) = out_csv {
                io::export_timeline_csv(path, &schedule)?;
            }
            for day in &schedule {
                match &day.interval {
                    Some(i) => println!(
                        "{} | {} | {} → {}",
                        day.item.date,
                        day.item.phase,
                        i.start.to_rfc3339(),
                        i.end.to_rfc3339()
                    ),
                    None => println!("{} | {}", day.item.date, day.item.phase),
                }
            }
            0
        }
        Commands::Aggregate {
            from,
            to,
            leaves,
            adjustments,
            holidays,
            detail,
        } => {
            let mut profile = Profile::load(&cli.profile)?;
            if let Some(path) = holidays {
                profile.holidays.extend(io::import_holidays_csv(path)?);
            }
            let calendar = profile.calendar()?;
            let leaves = match leaves {
                Some(path) => io::import_leaves_csv(path)?,
                None => BTreeMap::new(),
            };
            let ledger = match adjustments {
                Some(path) => io::import_adjustments_csv(path)?,
                None => EventLedger::new(),
            };

            let aggregator = WorkDaysAggregator::new(profile.env(&calendar));
            let range = DateRange::new(from, to);
            if detail {
                for day in aggregator.breakdown(range, &profile.context, &leaves, &ledger) {
                    let mark = match (day.leave, day.deducted) {
                        (Some(kind), true) => format!(" ({} leave, deducted)", kind.as_str()),
                        (Some(kind), false) => format!(" ({} leave)", kind.as_str()),
                        (None, _) => String::new(),
                    };
                    println!("{} | {} | {} min{}", day.date, day.phase, day.minutes, mark);
                }
            }
            let result = aggregator.aggregate(range, &profile.context, &leaves, &ledger);
            println!("{}", serde_json::to_string_pretty(&result)?);
            0
        }
        Commands::DstCheck { at, timezone } => {
            let calendar = match timezone {
                Some(tz) => LocaleCalendar::from_identifier(&tz)?,
                None => Profile::load(&cli.profile)?.calendar()?,
            };
            let state = JsonFileStore::open(&cli.state)?;
            let validator = DstValidator::from_store(&state)?;
            let check = validator.validate_shift_time(at, calendar.timezone());
            match (&check.transition, &check.message) {
                (Some(transition), Some(message)) => {
                    println!("{transition:?}: {message}");
                    if let Some(adjusted) = check.adjusted_time {
                        println!("adjusted: {}", adjusted.to_rfc3339());
                    }
                }
                _ => println!("OK: no DST transition"),
            }
            0
        }
        Commands::TzCheck { timezone } => {
            let current = LocaleCalendar::from_identifier(&timezone)?.timezone();
            let state = JsonFileStore::open(&cli.state)?;
            let mut detector = TimezoneChangeDetector::new(state);
            match detector.check_now(current)? {
                Some(change) => {
                    println!(
                        "timezone changed: {} → {} ({:+}h)",
                        change.old_timezone, change.new_timezone, change.hours_difference
                    );
                    // Code 2 = WARNING : vérifier les heures de poste
                    if change.is_significant {
                        2
                    } else {
                        0
                    }
                }
                None => {
                    println!("OK: no timezone change");
                    0
                }
            }
        }
    };

    std::process::exit(code);
}

/// Vérifie qu'un ancrage est résolu, en générant un jour de frise.
fn system_is_anchorable(context: &ShiftContext) -> bool {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::new(&calendar, &NoHolidays);
    !ShiftSystem::for_context(context)
        .build_timeline(context, &env, context.reference_date, 1)
        .is_empty()
}
