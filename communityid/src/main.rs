mod runtime;

use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{anyhow, bail};
use communityid::{CommunityIdGenerator, FlowTuple};
use tracing::{debug, info, warn};

use crate::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    let runtime = Runtime::new()?;
    runtime.init_logging();

    let Runtime { cli, conf } = runtime;
    let generator = CommunityIdGenerator::from(&conf);

    debug!(
        event.name = "runtime.started",
        seed = generator.seed(),
        encoding = %generator.encoding(),
        config_path = ?conf.config_path,
        "community id generator configured"
    );

    if !cli.flow.is_empty() {
        let field = |i: usize| cli.flow.get(i).map(String::as_str);
        let flow = FlowTuple::from_fields(field(0), field(1), field(2), field(3), field(4))?;
        let id = generator.generate_flow(&flow)?;
        println!("{id}");
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = hash_lines(&generator, stdin.lock(), &mut out)?;
    out.flush()?;

    info!(
        event.name = "runtime.finished",
        flows.hashed = stats.hashed,
        flows.failed = stats.failed,
        "finished reading flows from stdin"
    );

    if stats.failed > 0 {
        bail!("{} of {} flows could not be hashed", stats.failed, stats.total());
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LineStats {
    hashed: usize,
    failed: usize,
}

impl LineStats {
    fn total(&self) -> usize {
        self.hashed + self.failed
    }
}

/// Hashes one five-tuple per input line, writing one ID per line. Blank lines
/// and `#` comments are skipped; invalid lines are logged and counted.
fn hash_lines<R: BufRead, W: Write>(
    generator: &CommunityIdGenerator,
    reader: R,
    mut writer: W,
) -> anyhow::Result<LineStats> {
    let mut stats = LineStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| anyhow!("failed to read line {}: {e}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line
            .parse::<FlowTuple>()
            .and_then(|flow| generator.generate_flow(&flow))
        {
            Ok(id) => {
                writeln!(writer, "{id}")?;
                stats.hashed += 1;
            }
            Err(e) => {
                warn!(
                    event.name = "flow.rejected",
                    line.number = idx + 1,
                    error = %e,
                    "skipping invalid flow"
                );
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
