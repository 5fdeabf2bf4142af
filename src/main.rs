// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, Context};
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use the_dipper::config::consts::DEFAULT_CONFIG_FILE;
use the_dipper::traits::SetupResult;
use the_dipper::{create_application, Exports, Imports, PackageMeta, Registrar, SetupRegistry};

/// Numeric settings shared by the demo packages
#[derive(Debug, Clone, Copy)]
struct Settings {
    precision: u32,
}

/// The capability the `calculator` package provides
#[derive(Debug, Clone, Copy)]
struct Calculator {
    settings: Settings,
}

impl Calculator {
    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.settings.precision as i32);
        (value * factor).round() / factor
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        self.round(a + b)
    }

    fn divide(&self, a: f64, b: f64) -> Option<f64> {
        (b != 0.0).then(|| self.round(a / b))
    }
}

/// Setup routines for the calculator demo, keyed the way `configs/calculator.yaml` names them
fn demo_entry_points() -> SetupRegistry {
    SetupRegistry::new()
        .with_fn("settings", setup_settings)
        .with_fn("calculator/calculator_main", setup_calculator)
        .with_fn("report/index", setup_report)
}

fn setup_settings(
    meta: &PackageMeta,
    _imports: Imports,
    _registrar: Registrar,
) -> SetupResult {
    let precision = meta
        .option("precision")
        .and_then(|v| v.as_u64())
        .unwrap_or(2) as u32;

    Ok(Some(Exports::new().with("settings", Settings { precision })))
}

fn setup_calculator(
    _meta: &PackageMeta,
    imports: Imports,
    _registrar: Registrar,
) -> SetupResult {
    let settings = imports
        .get_as::<Settings>("settings")
        .ok_or("settings import is missing or has the wrong type")?;

    Ok(Some(Exports::new().with(
        "calculator",
        Calculator {
            settings: *settings,
        },
    )))
}

/// Registers its report from a spawned task, after setup has returned.
fn setup_report(
    _meta: &PackageMeta,
    imports: Imports,
    registrar: Registrar,
) -> SetupResult {
    let calculator = imports
        .get_as::<Calculator>("calculator")
        .ok_or("calculator import is missing or has the wrong type")?;

    tokio::spawn(async move {
        let report = match calculator.divide(calculator.add(1.0, 2.5), 3.0) {
            Some(result) => format!("(1 + 2.5) / 3 = {}", result),
            None => {
                registrar.fail("division by zero");
                return;
            }
        };
        registrar.register_one("report", report);
    });

    Ok(None)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_file = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    println!("🥣 the-dipper");
    println!("Config file: {}", config_file);

    let start_time = Instant::now();
    let app = create_application(&config_file, demo_entry_points())
        .await
        .with_context(|| format!("failed to bootstrap {}", config_file))?;

    println!("\n🔄 Setup order:");
    for (i, meta) in app.packages().iter().enumerate() {
        println!(
            "  {}. {} (provides: [{}], consumes: [{}])",
            i + 1,
            meta.name,
            meta.provides.join(", "),
            meta.consumes.join(", ")
        );
    }

    println!("\n📦 Registered services:");
    for name in app.services().names() {
        println!("  • {} (from {})", name, app.services().owner(name).unwrap_or("?"));
    }

    if app.services().contains("report") {
        let report = app
            .services()
            .get_as::<String>("report")
            .ok_or_else(|| anyhow!("'report' is not a string"))?;
        println!("\n🎯 Report: {}", report);
    }

    println!("\n⏱️  Total Time: {:?}", start_time.elapsed());
    Ok(())
}
