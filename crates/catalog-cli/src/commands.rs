//! CLI command implementations.

use anyhow::{anyhow, bail, Context};
use catalog_router::{History, Location, PathPattern, Route, Router};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

pub type Result<T> = anyhow::Result<T>;

/// One history traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Forward,
    Go(isize),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "back" => Ok(Step::Back),
            "forward" => Ok(Step::Forward),
            other => {
                let delta = other
                    .strip_prefix("go:")
                    .ok_or_else(|| anyhow!("unknown step '{other}', expected back, forward or go:N"))?;
                let delta = delta
                    .parse()
                    .with_context(|| format!("invalid go delta '{delta}'"))?;
                Ok(Step::Go(delta))
            }
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Back => f.write_str("back"),
            Step::Forward => f.write_str("forward"),
            Step::Go(delta) => write!(f, "go:{delta}"),
        }
    }
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Resolve each href and print its route.
pub fn resolve(hrefs: &[String], out: &mut impl Write) -> Result<()> {
    for href in hrefs {
        let location = Location::parse(href);
        let route = catalog_router::resolve(&location);
        tracing::debug!(href = %href, location = %location, route = %route.kind(), "Resolved");
        write_json(out, &route)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct RuleLine {
    name: &'static str,
    #[serde(rename = "match")]
    kind: &'static str,
    pattern: &'static str,
}

/// Print the standard routing table.
pub fn routes(out: &mut impl Write) -> Result<()> {
    let table = catalog_router::RouteTable::standard();
    for rule in table.rules() {
        let (kind, pattern) = match rule.pattern() {
            PathPattern::Exact(p) => ("exact", p),
            PathPattern::Prefix(p) => ("prefix", p),
        };
        write_json(
            out,
            &RuleLine {
                name: rule.name(),
                kind,
                pattern,
            },
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ReplayLine<'a> {
    step: String,
    route: &'a Route,
}

/// Replay a session: visit `hrefs` in order, subscribe a router, then
/// apply `steps`, printing every route the subscriber receives.
pub fn replay(hrefs: &[String], steps: &[Step], out: &mut impl Write) -> Result<()> {
    let (first, rest) = hrefs
        .split_first()
        .ok_or_else(|| anyhow!("replay needs at least one href"))?;

    let history = Arc::new(History::new(Location::parse(first)));
    for href in rest {
        history.push(Location::parse(href));
    }

    let router = Router::attach(Arc::clone(&history));
    let delivered: Arc<Mutex<Vec<Route>>> = Arc::default();
    let sink = Arc::clone(&delivered);
    let subscription = router.subscribe(move |route| sink.lock().push(route.clone()));

    let mut flush = |label: String| -> Result<()> {
        for route in delivered.lock().drain(..) {
            write_json(
                out,
                &ReplayLine {
                    step: label.clone(),
                    route: &route,
                },
            )?;
        }
        Ok(())
    };

    flush("subscribe".to_string())?;
    for step in steps {
        let moved = match *step {
            Step::Back => history.back(),
            Step::Forward => history.forward(),
            Step::Go(delta) => history.go(delta),
        };
        if !moved {
            tracing::info!(step = %step, cursor = history.cursor(), "Step left history unchanged");
        }
        flush(step.to_string())?;
    }

    subscription.unsubscribe();
    if router.subscriber_count() != 0 {
        bail!("subscription still registered after unsubscribe");
    }
    Ok(())
}
