use anyhow::Context;
use clap::Parser;
use interval_rbset::{Event, Interval, IntervalTree};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fill an interval tree with random events and run a few queries against it.
#[derive(Parser, Debug)]
#[clap(name = "interval-rbset")]
struct Options {
    /// Number of random events to insert.
    #[clap(long, short = 'n', default_value = "20")]
    count: usize,

    /// Event bounds are drawn from `0..max`.
    #[clap(long, default_value = "100")]
    max: i64,

    /// Longest event, in units of the bound domain.
    #[clap(long, default_value = "15")]
    max_len: i64,

    /// RNG seed, for reproducible runs.
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Start of the overlap query, inclusive.
    #[clap(long, default_value = "40")]
    from: i64,

    /// End of the overlap query, exclusive.
    #[clap(long, default_value = "60")]
    to: i64,

    /// Point for the stabbing query.
    #[clap(long, default_value = "50")]
    point: i64,

    /// Print the tree structure after building it.
    #[clap(long)]
    dump: bool,
}

/// An event starting in `0..max` and spanning `1..=max_len`.
fn random_event<R: Rng>(
    rng: &mut R,
    options: &Options,
    id: usize,
) -> anyhow::Result<Event<i64, usize>> {
    let from = rng.gen_range(0..options.max);
    let len = rng.gen_range(1..=options.max_len);
    let to = from
        .checked_add(len)
        .with_context(|| format!("event {} overflows: {} + {}", id, from, len))?;
    Ok(Event::try_new(from, to, id)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let options = Options::parse();
    debug!("{:?}", options);

    anyhow::ensure!(options.max > 0, "--max must be positive");
    anyhow::ensure!(options.max_len > 0, "--max-len must be positive");

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut tree = IntervalTree::new();
    for id in 0..options.count {
        tree.insert(random_event(&mut rng, &options, id)?);
    }
    info!("inserted {} events", tree.len());

    if options.dump {
        print!("{}", tree.tree().dump());
        println!();
    }

    if let Some(bounds) = tree.bounds() {
        println!("bounds: {}", bounds);
    }

    let query = Interval::new(options.from, options.to).context("invalid query interval")?;
    println!("overlapping {}:", query);
    for event in tree.overlaps(&query) {
        println!("  {}", event);
    }

    println!("containing {}:", options.point);
    for event in tree.stabbing(&options.point) {
        println!("  {}", event);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_events_stay_in_range() {
        let options = Options::parse_from(["interval-rbset", "--max", "10", "--max-len", "3"]);
        let mut rng = StdRng::seed_from_u64(1);
        for id in 0..100 {
            let e = random_event(&mut rng, &options, id).unwrap();
            assert!((0..10).contains(e.interval().from()));
            assert!(*e.interval().to() - *e.interval().from() <= 3);
        }
    }

    #[test]
    fn huge_bounds_fail_instead_of_overflowing() {
        let max = i64::MAX.to_string();
        let options =
            Options::parse_from(["interval-rbset", "--max", max.as_str(), "--max-len", max.as_str()]);
        let mut rng = StdRng::seed_from_u64(1);
        let failed = (0..20).any(|id| random_event(&mut rng, &options, id).is_err());
        assert!(failed);
    }
}
