//! Recursive walking of nested schemas, maps and optional boxes.

mod common;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::{Result, anyhow, ensure};
use common::Collected;
use overlay_config::{FieldKind, Loader, MapEnv, Overlay};
use rstest::{fixture, rstest};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, Overlay)]
#[serde(default)]
struct Root {
    #[overlay(nested)]
    database: Database,
    #[overlay(nested)]
    replicas: BTreeMap<String, Database>,
    #[overlay(nested)]
    cache: Option<Box<Cache>>,
    #[overlay(nested)]
    shards: HashMap<String, Cache>,
    #[overlay(nested)]
    extra: Option<BTreeMap<String, Cache>>,
    labels: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Overlay)]
#[serde(default)]
struct Database {
    #[overlay(env = "DB_URL", default = "postgres://localhost")]
    url: String,
    #[overlay(default = 5)]
    pool: u8,
    #[overlay(nested)]
    tls: Tls,
}

#[derive(Debug, Default, Deserialize, Overlay)]
#[serde(default)]
struct Tls {
    #[overlay(env = "TLS_CERT")]
    cert: PathBuf,
    #[overlay(env = "TLS_DEPTH", default = 3)]
    depth: u8,
}

#[derive(Debug, Default, Deserialize, Overlay)]
#[serde(default)]
struct Cache {
    #[overlay(env = "CACHE_TTL", default = 60)]
    ttl: u32,
}

const DOC: &str = "\
database:
  pool: 10
replicas:
  east:
    url: postgres://east
  west:
    tls:
      depth: 7
cache:
  ttl: 0
shards:
  a: {}
  b:
    ttl: 5
labels:
  DB_URL: left-alone
";

#[fixture]
fn collected() -> Collected {
    Collected::default()
}

fn load(env: MapEnv, collected: &Collected, doc: &str) -> Result<Root> {
    Loader::with_env(env)
        .reporter(collected.reporter())
        .unmarshal_str(doc)
        .map_err(|err| anyhow!(err.to_string()))
}

#[rstest]
fn defaults_reach_every_depth(collected: Collected) -> Result<()> {
    let root = load(MapEnv::new(), &collected, DOC)?;
    ensure!(root.database.url == "postgres://localhost");
    ensure!(root.database.pool == 10, "document value kept");
    ensure!(root.database.tls.depth == 3);

    let east = root.replicas.get("east").ok_or_else(|| anyhow!("east missing"))?;
    let west = root.replicas.get("west").ok_or_else(|| anyhow!("west missing"))?;
    ensure!(east.url == "postgres://east" && east.pool == 5 && east.tls.depth == 3);
    ensure!(west.url == "postgres://localhost" && west.tls.depth == 7);

    ensure!(root.cache.as_ref().is_some_and(|cache| cache.ttl == 60));
    ensure!(root.shards.get("a").is_some_and(|shard| shard.ttl == 60));
    ensure!(root.shards.get("b").is_some_and(|shard| shard.ttl == 5));
    ensure!(root.extra.is_none(), "absent optional maps stay absent");
    ensure!(collected.issues()?.is_empty());
    Ok(())
}

#[rstest]
fn environment_applies_to_every_instance(collected: Collected) -> Result<()> {
    let env = MapEnv::from_iter([
        ("DB_URL", "postgres://env"),
        ("TLS_CERT", "/etc/tls/cert.pem"),
        ("CACHE_TTL", "1"),
    ]);
    let root = load(env, &collected, DOC)?;
    let urls: Vec<_> = std::iter::once(&root.database)
        .chain(root.replicas.values())
        .map(|db| db.url.as_str())
        .collect();
    ensure!(urls.iter().all(|url| *url == "postgres://env"), "got {urls:?}");
    ensure!(root.database.tls.cert == PathBuf::from("/etc/tls/cert.pem"));
    ensure!(root.shards.values().all(|shard| shard.ttl == 1));
    ensure!(root.cache.as_ref().is_some_and(|cache| cache.ttl == 1));
    Ok(())
}

#[rstest]
fn scalar_maps_are_left_alone(collected: Collected) -> Result<()> {
    let root = load(MapEnv::from_iter([("DB_URL", "postgres://env")]), &collected, DOC)?;
    ensure!(
        root.labels.get("DB_URL").map(String::as_str) == Some("left-alone"),
        "got {:?}",
        root.labels
    );
    Ok(())
}

#[rstest]
fn optional_maps_are_walked_when_present(collected: Collected) -> Result<()> {
    let root = load(MapEnv::new(), &collected, "extra:\n  hot:\n    ttl: 0\n")?;
    let extra = root.extra.ok_or_else(|| anyhow!("extra missing"))?;
    ensure!(extra.get("hot").is_some_and(|cache| cache.ttl == 60));
    ensure!(root.cache.is_none(), "absent boxes are not created");
    Ok(())
}

#[rstest]
fn issues_carry_dotted_paths(collected: Collected) -> Result<()> {
    load(MapEnv::from_iter([("TLS_DEPTH", "deep")]), &collected, DOC)?;
    let mut paths: Vec<_> = collected
        .issues()?
        .into_iter()
        .map(|issue| issue.path)
        .collect();
    paths.sort();
    ensure!(
        paths == ["database.tls.depth", "replicas.east.tls.depth", "replicas.west.tls.depth"],
        "got {paths:?}"
    );
    Ok(())
}

#[derive(Debug, Default, Deserialize, Overlay)]
#[serde(default, rename_all = "kebab-case")]
struct Renamed {
    #[serde(rename = "type")]
    #[overlay(env = "KIND")]
    kind: String,
    max_size: u32,
    #[overlay(nested)]
    tls: Tls,
    #[overlay(skip)]
    scratch: Vec<u8>,
}

#[rstest]
fn descriptors_mirror_the_schema() -> Result<()> {
    let table: Vec<_> = Renamed::FIELDS
        .iter()
        .map(|field| (field.name, field.key, field.kind))
        .collect();
    ensure!(
        table
            == [
                ("kind", "type", FieldKind::Scalar),
                ("max_size", "max-size", FieldKind::Passthrough),
                ("tls", "tls", FieldKind::Nested),
                ("scratch", "scratch", FieldKind::Passthrough),
            ],
        "got {table:?}"
    );
    ensure!(Renamed::FIELDS.first().and_then(|field| field.env) == Some("KIND"));
    ensure!(Root::FIELDS.iter().filter(|field| field.kind == FieldKind::Map).count() == 3);
    Ok(())
}

mod aliased {
    use overlay_config as cfg;

    #[derive(Debug, Default, cfg::Overlay)]
    #[overlay(crate = "cfg")]
    pub struct Flags {
        #[overlay(default = true)]
        pub enabled: bool,
    }
}

#[rstest]
fn crate_path_can_be_renamed() {
    let mut flags = aliased::Flags::default();
    Loader::with_env(MapEnv::new()).overlay(&mut flags);
    assert!(flags.enabled);
}
