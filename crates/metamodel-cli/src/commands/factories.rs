use crate::support::{load_config_or_exit, loader_or_exit, print_json};
use metamodel_kernel::RegistrationKind;
use serde_json::json;

pub fn run(config: Option<String>, json_output: bool) {
    let config = load_config_or_exit(config.as_deref());
    let filter = config.init_filter();
    let loader = loader_or_exit(config);
    let model = loader.programming_model();

    let excluded: Vec<_> = model
        .registrations()
        .into_iter()
        .filter(|registration| !filter.accepts(&registration.markers))
        .collect();

    if json_output {
        let factories: Vec<_> = model
            .active_factories()
            .iter()
            .map(|active| {
                json!({
                    "order": active.order(),
                    "name": active.name(),
                    "featureTypes": active
                        .factory()
                        .feature_types()
                        .iter()
                        .map(|feature_type| feature_type.as_str())
                        .collect::<Vec<_>>(),
                    "markers": active.markers(),
                })
            })
            .collect();
        let post_processors: Vec<&str> = model
            .post_processors()
            .iter()
            .map(|post_processor| post_processor.name())
            .collect();
        print_json(&json!({
            "factories": factories,
            "validators": loader.validators().names(),
            "postProcessors": post_processors,
            "excluded": excluded,
        }));
        return;
    }

    println!("metamodel factories");
    let mut current = None;
    for active in model.active_factories() {
        if current != Some(active.order()) {
            current = Some(active.order());
            println!("  {}:", active.order());
        }
        let markers: Vec<&str> = active.markers().iter().map(|marker| marker.as_str()).collect();
        if markers.is_empty() {
            println!("    - {}", active.name());
        } else {
            println!("    - {} [{}]", active.name(), markers.join(", "));
        }
    }
    println!("  validators:");
    for name in loader.validators().names() {
        println!("    - {name}");
    }
    println!("  post-processors:");
    for post_processor in model.post_processors() {
        println!("    - {}", post_processor.name());
    }
    if !excluded.is_empty() {
        println!("  excluded:");
        for registration in &excluded {
            let kind = match registration.kind {
                RegistrationKind::Factory => "factory",
                RegistrationKind::Validator => "validator",
                RegistrationKind::PostProcessor => "post-processor",
            };
            println!("    - {} ({kind})", registration.name);
        }
    }
}
