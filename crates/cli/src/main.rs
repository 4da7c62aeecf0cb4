use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use cardiodx_core::{
    resolve_model_dir, ChestPainType, ClinicalInput, CoreConfig, DiagnosticService, ModelRegistry,
    RestingEcg, Sex, StSlope, Thalassemia, PRIMARY_MODEL_NAME,
};

#[derive(Parser)]
#[command(name = "cardiodx")]
#[command(about = "CardioDx cardiac risk scoring CLI")]
struct Cli {
    /// Model artifact directory override
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one set of clinical attributes
    Diagnose {
        /// Age in years
        #[arg(long)]
        age: u32,
        /// "male" or "female"
        #[arg(long)]
        sex: String,
        /// Chest pain type label
        #[arg(long, default_value = "typical angina")]
        chest_pain: String,
        /// Resting blood pressure (mmHg)
        #[arg(long)]
        resting_bp: u32,
        /// Serum cholesterol (mg/dl)
        #[arg(long)]
        cholesterol: u32,
        /// Fasting blood sugar above 120 mg/dl
        #[arg(long)]
        fasting_blood_sugar: bool,
        /// Resting ECG result label
        #[arg(long, default_value = "normal")]
        resting_ecg: String,
        /// Maximum heart rate achieved
        #[arg(long)]
        max_heart_rate: u32,
        /// Exercise-induced angina
        #[arg(long)]
        exercise_angina: bool,
        /// ST depression ("oldpeak")
        #[arg(long, default_value_t = 0.0)]
        st_depression: f64,
        /// ST slope label
        #[arg(long, default_value = "upsloping")]
        st_slope: String,
        /// Number of major vessels (0-4)
        #[arg(long, default_value_t = 0)]
        major_vessels: u8,
        /// Thalassemia result label
        #[arg(long, default_value = "normal")]
        thalassemia: String,
    },
    /// List the registered models
    Models,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let registry = {
        let model_dir = resolve_model_dir(cli.model_dir.clone())?;
        let cfg = CoreConfig::new(model_dir)?;
        match ModelRegistry::load(cfg.model_dir()) {
            Ok(registry) => registry,
            Err(e) => {
                eprintln!("The diagnostic models could not be loaded: {e}");
                std::process::exit(1);
            }
        }
    };

    match cli.command {
        Some(Commands::Diagnose {
            age,
            sex,
            chest_pain,
            resting_bp,
            cholesterol,
            fasting_blood_sugar,
            resting_ecg,
            max_heart_rate,
            exercise_angina,
            st_depression,
            st_slope,
            major_vessels,
            thalassemia,
        }) => {
            let input = ClinicalInput {
                age,
                sex: Sex::from_label(&sex),
                chest_pain: ChestPainType::from_label(&chest_pain),
                resting_bp,
                cholesterol,
                fasting_blood_sugar,
                resting_ecg: RestingEcg::from_label(&resting_ecg),
                max_heart_rate,
                exercise_angina,
                st_depression,
                st_slope: StSlope::from_label(&st_slope),
                major_vessels,
                thalassemia: Thalassemia::from_label(&thalassemia),
            };

            let service = DiagnosticService::new(Arc::new(registry));
            match service.diagnose(&input) {
                Ok(diagnosis) => {
                    println!(
                        "Assessment: {} ({:.1}% probability, {:.1}% confidence)",
                        diagnosis.risk.tier.label(),
                        diagnosis.ensemble.consensus_probability * 100.0,
                        diagnosis.ensemble.confidence * 100.0
                    );
                    println!("Recommendation: {}", diagnosis.risk.recommendation);
                    println!();
                    println!("Model comparison:");
                    for output in &diagnosis.ensemble.outputs {
                        println!(
                            "  {:<24} {:<18} {:>6.1}%",
                            output.name,
                            if output.predicted_class == 1 {
                                "heart disease"
                            } else {
                                "no heart disease"
                            },
                            output.probability * 100.0
                        );
                    }
                    for failure in &diagnosis.ensemble.failures {
                        println!("  {:<24} failed: {}", failure.name, failure.error);
                    }
                }
                Err(e) => {
                    eprintln!("No diagnosis was produced: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Models) => {
            for entry in registry.all() {
                let primary = if entry.name() == PRIMARY_MODEL_NAME {
                    " (primary)"
                } else {
                    ""
                };
                match entry.reported_accuracy() {
                    Some(accuracy) => println!(
                        "{}{} [{}] reported accuracy {:.1}%",
                        entry.name(),
                        primary,
                        entry.family(),
                        accuracy * 100.0
                    ),
                    None => println!("{}{} [{}]", entry.name(), primary, entry.family()),
                }
            }
        }
        None => {
            println!("Use 'cardiodx --help' for commands");
        }
    }

    Ok(())
}
