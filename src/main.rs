use std::collections::HashMap;

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use tracing::info;

mod catalog;
mod compose;
mod config;
mod enrich;
mod schema;
mod utils;

use catalog::{available_regions, load_region_catalog};
use compose::OutfitComposer;
use config::CONFIG;
use enrich::{enhance_prompt, Descriptor, EnhanceRequest};
use schema::region_schema;
use utils::logging::init_logging;

fn usage() -> &'static str {
    "Usage: outfit_prompter <command> [options]\n\
     Commands:\n\
       generate --region <code> [--seed <n>] [--no-seed] [--set <field>=<value> ...]\n\
                [--gender <g>] [--age <a>] [--trigger-word <text>] [--custom-text <text>]\n\
                [--detailed enabled|disabled]\n\
       enhance  --keywords <text> [--model <name>] [--style random|disabled|SDXL|Flux]\n\
                [--descriptor <label>=<value> ...] [--instructions <text>] [--seed <n>]\n\
                [--ollama-url <url>]\n\
       schema   [--region <code>]\n\
       regions"
}

fn take_value<'a>(args: &'a [String], index: &mut usize, flag: &str) -> Result<&'a str> {
    *index += 1;
    args.get(*index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing value for {flag}\n{}", usage()))
}

fn split_pair(raw: &str, flag: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected {flag} <name>=<value>, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Empty name in {flag} value '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

struct GenerateArgs {
    region: String,
    fields: HashMap<String, String>,
}

fn parse_generate_args(args: &[String]) -> Result<GenerateArgs> {
    let mut region = CONFIG.default_region.clone();
    let mut fields: HashMap<String, String> = HashMap::new();

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--region" => {
                region = take_value(args, &mut index, "--region")?.to_lowercase();
            }
            "--seed" => {
                let value = take_value(args, &mut index, "--seed")?;
                fields.insert("seed".to_string(), value.to_string());
            }
            "--no-seed" => {
                fields.remove("seed");
            }
            "--set" => {
                let raw = take_value(args, &mut index, "--set")?;
                let (key, value) = split_pair(raw, "--set")?;
                fields.insert(key, value);
            }
            "--gender" => {
                let value = take_value(args, &mut index, "--gender")?;
                fields.insert("gender".to_string(), value.to_string());
            }
            "--age" => {
                let value = take_value(args, &mut index, "--age")?;
                fields.insert("age".to_string(), value.to_string());
            }
            "--trigger-word" => {
                let value = take_value(args, &mut index, "--trigger-word")?;
                fields.insert("trigger_word".to_string(), value.to_string());
            }
            "--custom-text" => {
                let value = take_value(args, &mut index, "--custom-text")?;
                fields.insert("custom_text".to_string(), value.to_string());
            }
            "--detailed" => {
                let value = take_value(args, &mut index, "--detailed")?;
                fields.insert("detailed_description".to_string(), value.to_string());
            }
            "--help" | "-h" => return Err(anyhow!(usage())),
            other => return Err(anyhow!("Unknown generate argument: {other}\n{}", usage())),
        }
        index += 1;
    }

    Ok(GenerateArgs { region, fields })
}

fn parse_enhance_args(args: &[String]) -> Result<EnhanceRequest> {
    let mut keywords: Option<String> = None;
    let mut descriptors: Vec<Descriptor> = Vec::new();
    let mut style = "random".to_string();
    let mut custom_instructions: Option<String> = None;
    let mut model = CONFIG.ollama_model.clone();
    let mut seed = 0u64;
    let mut ollama_url = CONFIG.ollama_url.clone();

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--keywords" => {
                keywords = Some(take_value(args, &mut index, "--keywords")?.to_string());
            }
            "--descriptor" => {
                let raw = take_value(args, &mut index, "--descriptor")?;
                let (label, value) = split_pair(raw, "--descriptor")?;
                descriptors.push(Descriptor::new(label, value));
            }
            "--style" => {
                style = take_value(args, &mut index, "--style")?.to_string();
            }
            "--instructions" => {
                custom_instructions =
                    Some(take_value(args, &mut index, "--instructions")?.to_string());
            }
            "--model" => {
                model = take_value(args, &mut index, "--model")?.to_string();
            }
            "--seed" => {
                let value = take_value(args, &mut index, "--seed")?;
                seed = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow!("Invalid --seed value: {value}"))?;
            }
            "--ollama-url" => {
                ollama_url = take_value(args, &mut index, "--ollama-url")?.to_string();
            }
            "--help" | "-h" => return Err(anyhow!(usage())),
            other => return Err(anyhow!("Unknown enhance argument: {other}\n{}", usage())),
        }
        index += 1;
    }

    let keywords = keywords.ok_or_else(|| anyhow!("--keywords is required\n{}", usage()))?;
    Ok(EnhanceRequest {
        keywords,
        descriptors,
        style,
        custom_instructions,
        model,
        seed,
        ollama_url,
    })
}

fn run_generate(args: &[String]) -> Result<()> {
    let parsed = parse_generate_args(args)?;
    let catalog = load_region_catalog(&CONFIG.data_dir, &parsed.region);
    let composer = OutfitComposer::new(catalog);

    let result = composer.generate_from_fields(&parsed.fields);
    info!("Generated description for region '{}'", parsed.region);
    println!("{}", result.description);
    match result.seed {
        Some(seed) => println!("seed: {seed}"),
        None => println!("seed: none"),
    }
    Ok(())
}

async fn run_enhance(args: &[String]) -> Result<()> {
    let request = parse_enhance_args(args)?;
    let enhanced = enhance_prompt(&request).await?;
    println!("{enhanced}");
    Ok(())
}

fn run_schema(args: &[String]) -> Result<()> {
    let mut region = CONFIG.default_region.clone();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--region" => {
                region = take_value(args, &mut index, "--region")?.to_lowercase();
            }
            other => return Err(anyhow!("Unknown schema argument: {other}\n{}", usage())),
        }
        index += 1;
    }

    let catalog = load_region_catalog(&CONFIG.data_dir, &region);
    let schema = region_schema(&catalog);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_regions() -> Result<()> {
    let regions = available_regions(&CONFIG.data_dir);
    if regions.is_empty() {
        println!("No region data found under {}", CONFIG.data_dir.display());
        return Ok(());
    }
    for region in regions {
        let catalog = load_region_catalog(&CONFIG.data_dir, &region);
        let country = catalog.country();
        let label = if country.flag.is_empty() {
            country.name.clone()
        } else {
            format!("{} {}", country.flag, country.name)
        };
        println!("{region}\t{label}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guards = init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        return Err(anyhow!(usage()));
    };

    match command.as_str() {
        "generate" => run_generate(&args[1..]),
        "enhance" => run_enhance(&args[1..]).await,
        "schema" => run_schema(&args[1..]),
        "regions" => run_regions(),
        "help" | "--help" | "-h" => {
            println!("{}", usage());
            Ok(())
        }
        other => Err(anyhow!("Unknown command: {other}\n{}", usage())),
    }
}
