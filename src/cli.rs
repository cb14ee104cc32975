/*!
ggroup Command Line Interface

Groups a JSON array of rows and prints each group's channel values as JSON.
*/

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ggroup::transform::partition::groups;
use ggroup::{group, group_x, group_y, Accessor, GroupOptions, GroupedMark, NormalizeSpec, VERSION};

#[derive(Parser)]
#[command(name = "ggroup")]
#[command(about = "Group rows by categorical keys and count them")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group by an x key, counting rows on y
    GroupX {
        /// Field holding the x key (defaults to the row itself)
        #[arg(long)]
        x: Option<String>,

        /// Normalize counts: true for percent, or a multiplier
        #[arg(long)]
        normalize: Option<NormalizeSpec>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Group by a y key, counting rows on x
    GroupY {
        /// Field holding the y key (defaults to the row itself)
        #[arg(long)]
        y: Option<String>,

        /// Normalize counts: true for percent, or a multiplier
        #[arg(long)]
        normalize: Option<NormalizeSpec>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Group by an x key and a y key
    Group {
        /// Field holding the x key (defaults to the first element of each row)
        #[arg(long)]
        x: Option<String>,

        /// Field holding the y key (defaults to the second element of each row)
        #[arg(long)]
        y: Option<String>,

        /// Channel that receives the group size
        #[arg(long)]
        out: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
pub struct CommonArgs {
    /// JSON file with an array of rows (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// JSON file with grouping options; flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Field to facet rows by
    #[arg(long)]
    pub facet: Option<String>,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn load_options(config: Option<&Path>) -> anyhow::Result<GroupOptions> {
    let Some(path) = config else {
        return Ok(GroupOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid grouping options in {}", path.display()))
}

fn load_rows(input: Option<&Path>) -> anyhow::Result<Vec<serde_json::Value>> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read rows from stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("Input must be a JSON array of rows")
}

/// One facet per distinct defined value of `field`, in first-occurrence order
fn facet_by(rows: &[serde_json::Value], field: &str) -> ggroup::Result<Vec<Vec<usize>>> {
    let values = Accessor::field(field).resolve(rows)?;
    Ok(groups(0..rows.len(), |&i| values[i].clone())
        .into_iter()
        .filter(|(key, _)| key.is_defined())
        .map(|(_, index)| index)
        .collect())
}

/// Evaluate a mark over rows and lay the result out as JSON
fn run(
    mark: &GroupedMark,
    rows: &[serde_json::Value],
    facets: Option<&[Vec<usize>]>,
) -> anyhow::Result<serde_json::Value> {
    let grouped = mark.apply(rows, facets)?;
    info!("Produced {} groups from {} rows", grouped.data.len(), rows.len());

    let mut out = Vec::with_capacity(grouped.data.len());
    for g in &grouped.data {
        let channels: Map<String, serde_json::Value> = mark
            .evaluate(g)?
            .into_iter()
            .map(|(name, value)| -> anyhow::Result<(String, serde_json::Value)> {
                Ok((name, serde_json::to_value(value)?))
            })
            .collect::<anyhow::Result<_>>()?;
        out.push(json!({ "channels": channels, "index": g.index }));
    }

    Ok(json!({
        "index": grouped.index,
        "groups": out,
        "labels": mark.labels(),
        "options": mark.options,
    }))
}

fn execute(command: Commands) -> anyhow::Result<(serde_json::Value, Option<PathBuf>)> {
    let (mark, common) = match command {
        Commands::GroupX {
            x,
            normalize,
            common,
        } => {
            let mut options = load_options(common.config.as_deref())?;
            if let Some(x) = x {
                options.x = Some(Accessor::field(x));
            }
            if let Some(normalize) = normalize {
                options.normalize = Some(normalize);
            }
            (group_x(options), common)
        }
        Commands::GroupY {
            y,
            normalize,
            common,
        } => {
            let mut options = load_options(common.config.as_deref())?;
            if let Some(y) = y {
                options.y = Some(Accessor::field(y));
            }
            if let Some(normalize) = normalize {
                options.normalize = Some(normalize);
            }
            (group_y(options), common)
        }
        Commands::Group { x, y, out, common } => {
            let mut options = load_options(common.config.as_deref())?;
            if let Some(x) = x {
                options.x = Some(Accessor::field(x));
            }
            if let Some(y) = y {
                options.y = Some(Accessor::field(y));
            }
            if out.is_some() {
                options.out = out;
            }
            (group(options), common)
        }
    };

    let rows = load_rows(common.input.as_deref())?;
    info!("Loaded {} rows", rows.len());

    let facets = match &common.facet {
        Some(field) => {
            let facets = facet_by(&rows, field)?;
            info!("Faceting by '{}' into {} facets", field, facets.len());
            Some(facets)
        }
        None => None,
    };

    let result = run(&mark, &rows, facets.as_deref())?;
    Ok((result, common.output))
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ggroup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let (result, output) = execute(cli.command)?;
    let text = serde_json::to_string_pretty(&result)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Groups written to: {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn penguins() -> Vec<serde_json::Value> {
        vec![
            json!({"species": "Adelie", "island": "Torgersen"}),
            json!({"species": "Gentoo", "island": "Biscoe"}),
            json!({"species": "Adelie", "island": "Biscoe"}),
            json!({"species": "Adelie", "island": null}),
        ]
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "ggroup",
            "group-x",
            "--x",
            "species",
            "--normalize",
            "true",
            "rows.json",
        ])
        .unwrap();
        match cli.command {
            Commands::GroupX {
                x,
                normalize,
                common,
            } => {
                assert_eq!(x.as_deref(), Some("species"));
                assert_eq!(normalize, Some(NormalizeSpec::Percent));
                assert_eq!(common.input, Some(PathBuf::from("rows.json")));
            }
            _ => panic!("expected group-x"),
        }
    }

    #[test]
    fn test_facet_by_skips_missing() {
        let facets = facet_by(&penguins(), "island").unwrap();
        assert_eq!(facets, vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn test_run_faceted_output() {
        let rows = penguins();
        let mark = group_x(GroupOptions {
            x: Some(Accessor::field("species")),
            ..Default::default()
        });
        let facets = facet_by(&rows, "island").unwrap();
        let result = run(&mark, &rows, Some(facets.as_slice())).unwrap();

        assert_eq!(result["index"], json!([[0], [1, 2]]));
        assert_eq!(result["groups"][1]["channels"]["x"], json!("Adelie"));
        assert_eq!(result["groups"][2]["channels"]["x"], json!("Gentoo"));
        assert_eq!(result["groups"][2]["channels"]["y"], json!(1.0));
        assert_eq!(result["labels"]["x"], json!("species"));
    }

    #[test]
    fn test_config_file_with_flag_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"x": "island", "normalize": 1, "fill": "steelblue"}}"#
        )
        .unwrap();
        let options = load_options(Some(file.path())).unwrap();
        assert!(matches!(options.x, Some(Accessor::Field(ref f)) if f == "island"));
        assert_eq!(options.normalize, Some(NormalizeSpec::Scale(1.0)));

        let mut input = tempfile::NamedTempFile::new().unwrap();
        write!(input, "{}", serde_json::to_string(&penguins()).unwrap()).unwrap();

        let (result, output) = execute(Commands::GroupX {
            x: Some("species".to_string()),
            normalize: None,
            common: CommonArgs {
                input: Some(input.path().to_path_buf()),
                config: Some(file.path().to_path_buf()),
                facet: None,
                output: None,
            },
        })
        .unwrap();
        assert!(output.is_none());
        assert_eq!(result["groups"][0]["channels"]["x"], json!("Adelie"));
        assert_eq!(result["groups"][0]["channels"]["y"], json!(0.75));
        assert_eq!(result["options"]["fill"], json!("steelblue"));
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"normalize": [1]}}"#).unwrap();
        let err = load_options(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid grouping options"));
    }
}
