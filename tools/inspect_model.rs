//! Offline Artifact Inspection
//!
//! Dumps the hyperparameter document and model metadata without starting
//! the server. Hyperparameters are still printed when the model artifact
//! fails to load.

use anyhow::Result;
use extratrees_api::{AppConfig, ModelLoader, PredictiveModel};

fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {e:#}");
        AppConfig::default()
    });

    println!("{}", "=".repeat(70));
    println!("ALL BEST PARAMETERS FROM {}", config.artifacts.params_path);
    println!("{}", "=".repeat(70));

    match ModelLoader::load_params(&config.artifacts.params_path) {
        Ok(params) => {
            let mut names: Vec<&str> = params.model_names().collect();
            names.sort_unstable();

            for &name in &names {
                println!("\n{name}:");
                println!("{}", "-".repeat(70));
                let model_params = params.for_model(name);
                let mut keys: Vec<&String> = model_params.keys().collect();
                keys.sort_unstable();
                for key in keys {
                    println!("  {:25}: {}", key, model_params[key]);
                }
            }

            println!("\n{}", "=".repeat(70));
            println!("EXTRATREES PARAMETERS");
            println!("{}", "=".repeat(70));
            let extratrees = params.for_model("ExtraTrees");
            if extratrees.is_empty() {
                println!("  (no ExtraTrees entry found)");
            } else {
                let mut keys: Vec<&String> = extratrees.keys().collect();
                keys.sort_unstable();
                for key in keys {
                    println!("  {:25}: {}", key, extratrees[key]);
                }
            }
        }
        Err(e) => eprintln!("Could not load parameters: {e:#}"),
    }

    println!(
        "\nLoading model from {} ...",
        config.artifacts.model_path
    );

    let model = ModelLoader::new().and_then(|loader| {
        loader.load_model(
            &config.artifacts.model_path,
            &config.artifacts.manifest_path,
        )
    });

    match model {
        Ok(model) => {
            println!("\n{}", "=".repeat(70));
            println!("MODEL INFORMATION");
            println!("{}", "=".repeat(70));
            println!("Model Type: {}", model.model_type());
            println!("Number of Estimators: {}", model.estimator_count());
            println!("Number of Features: {}", model.feature_count());
            if let Some(n_outputs) = model.output_count() {
                println!("Number of Outputs: {n_outputs}");
            }

            if let Some(importances) = model.feature_importances() {
                println!("\nFeature Importances:");
                for (index, importance) in importances.iter().enumerate() {
                    println!("Feature_{index}: {importance}");
                }
            }

            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!("\nCould not load the model artifact:");
            eprintln!("  {e:#}");
            eprintln!("Hyperparameters above are still valid.");
        }
    }

    Ok(())
}
