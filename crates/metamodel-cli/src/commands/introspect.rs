use crate::support::{build_metamodel_or_exit, print_json};
use metamodel_kernel::{FacetHolder, ObjectSpecification};

pub fn run(model: String, config: Option<String>, type_name: Option<String>, json_output: bool) {
    let metamodel = build_metamodel_or_exit(&model, config.as_deref());

    let selected: Vec<&ObjectSpecification> = match &type_name {
        Some(type_name) => {
            let spec = metamodel
                .spec(type_name)
                .or_else(|| metamodel.spec_by_logical_type(type_name))
                .unwrap_or_else(|| {
                    eprintln!("error: type {type_name} is not part of the metamodel");
                    std::process::exit(1);
                });
            vec![spec]
        }
        None => metamodel.specs().collect(),
    };

    if json_output {
        match type_name {
            Some(_) => print_json(&selected[0]),
            None => print_json(&metamodel.to_json()),
        }
        return;
    }

    println!("metamodel introspect {model}");
    println!("  Types: {}", metamodel.len());
    println!("  Facets: {}", metamodel.facet_count());
    println!("  Validation failures: {}", metamodel.failures().len());
    println!("  Digest: {}", metamodel.digest());
    for spec in selected {
        println!(
            "  {} ({}) {:?}",
            spec.type_name(),
            spec.logical_type_name(),
            spec.bean_sort()
        );
        for member in spec.members() {
            let mixin = member
                .mixed_in_from()
                .map(|mixin| format!(" from {mixin}"))
                .unwrap_or_default();
            println!(
                "    - {} {} ({} facets){mixin}",
                member.feature_type(),
                member.name(),
                member.facets().count()
            );
        }
    }
}
