use anyhow::{Context, Result};
use rxscan_cli::setup::{
    OracleChoice, ServiceOptions, SimilarityChoice, build_service, load_filter, read_document,
};
use rxscan_resolve::ScanService;
use tracing::{Instrument, info, info_span};

use crate::cli::{
    CatalogArgs, CheckArgs, ExtractArgs, LinesArgs, LookupArgs, OracleArg, QueryArgs,
    SimilarityArg,
};
use crate::summary::{print_checks, print_entry, print_hits, print_matches};

fn catalog_options(catalog: &CatalogArgs) -> ServiceOptions {
    ServiceOptions {
        dataset: catalog.dataset.clone(),
        config: catalog.config.clone(),
        ..ServiceOptions::default()
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

pub async fn run_extract(args: &ExtractArgs) -> Result<()> {
    let options = ServiceOptions {
        lexicon: args.lexicon.clone(),
        exclude_words: args.exclude_words.clone(),
        lenient: args.lenient,
        partial_threshold: args.partial_threshold,
        approximate_threshold: args.approximate_threshold,
        max_distance: args.max_distance,
        oracle: match args.oracle {
            OracleArg::RejectAll => OracleChoice::RejectAll,
            OracleArg::AcceptAll => OracleChoice::AcceptAll,
        },
        similarity: match args.similarity {
            SimilarityArg::Fuzzy => SimilarityChoice::Fuzzy,
            SimilarityArg::None => SimilarityChoice::None,
        },
        ..catalog_options(&args.catalog)
    };
    let service = build_service(&options)?;
    let text = read_document(&args.input)?;

    let span = info_span!("document", path = %args.input.display());
    let results = service.extract(&text).instrument(span).await;
    info!(mentions = results.len(), "document scanned");

    if args.json {
        print_json(&results)
    } else {
        print_matches(&results);
        Ok(())
    }
}

pub fn run_lookup(args: &LookupArgs) -> Result<()> {
    let service = build_service(&catalog_options(&args.catalog))?;
    let entry = service.lookup_by_id(args.identifier.trim());
    if args.json {
        // A miss prints `{}`.
        match &entry {
            Some(entry) => print_json(entry),
            None => print_json(&serde_json::json!({})),
        }
    } else {
        print_entry(&args.identifier, entry.as_ref());
        Ok(())
    }
}

pub async fn run_query(args: &QueryArgs) -> Result<()> {
    let service = build_service(&catalog_options(&args.catalog))?;
    let top_k = args.top_k.unwrap_or(service.config().query_top_k);
    let hits = service.query_similar(&args.term, top_k).await;
    if args.json {
        return print_json(&hits);
    }
    let resolved: Vec<_> = hits
        .into_iter()
        .map(|hit| {
            let entry = service.lookup_by_id(&hit.identifier);
            (hit, entry)
        })
        .collect();
    print_hits(&args.term, &resolved);
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let filter = load_filter(args.lexicon.as_deref(), &args.exclude_words)?;
    let checks: Vec<(String, Option<String>)> = args
        .terms
        .iter()
        .map(|term| {
            let rule = filter.exclusion_reason(term).map(str::to_string);
            (term.clone(), rule)
        })
        .collect();
    print_checks(&checks);
    Ok(())
}

pub fn run_lines(args: &LinesArgs) -> Result<()> {
    let text = read_document(&args.input)?;
    let lines = ScanService::find_lines(&text, &args.query);
    if lines.is_empty() {
        println!("No lines mention {}.", args.query);
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
