use metamodel_kernel::{
    ClassDescriptor, MetaModelContext, Metamodel, MetamodelConfig, SpecificationLoader,
};
use metamodel_progmodel::standard_loader;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Exit status for a build whose validation report was rejected.
pub const EXIT_REJECTED: i32 = 2;

pub fn load_config_or_exit(config: Option<&str>) -> MetamodelConfig {
    let Some(path) = config else {
        return MetamodelConfig::default();
    };
    MetamodelConfig::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn read_classes_or_exit(path: &str) -> Vec<ClassDescriptor> {
    let path = Path::new(path);
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {}: {e}", path.display());
        std::process::exit(1);
    })
}

pub fn loader_or_exit(config: MetamodelConfig) -> SpecificationLoader {
    standard_loader(MetaModelContext::new(config)).unwrap_or_else(|e| {
        eprintln!("error: failed to initialize programming model: {e}");
        std::process::exit(1);
    })
}

/// Reads `model` and builds its metamodel with the standard programming model.
pub fn build_metamodel_or_exit(model: &str, config: Option<&str>) -> Metamodel {
    let config = load_config_or_exit(config);
    let classes = read_classes_or_exit(model);
    let mut loader = loader_or_exit(config);
    let metamodel = loader.load(&classes).unwrap_or_else(|e| {
        eprintln!("error: failed to build metamodel from {model}: {e}");
        std::process::exit(1);
    });
    tracing::info!(model, types = metamodel.len(), "metamodel built");
    metamodel
}

pub fn print_json(payload: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}
