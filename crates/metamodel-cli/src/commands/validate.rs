use crate::support::{EXIT_REJECTED, build_metamodel_or_exit, print_json};

pub fn run(model: String, config: Option<String>, fail_on_error: bool, json_output: bool) {
    let metamodel = build_metamodel_or_exit(&model, config.as_deref());
    let report = metamodel.report();

    if json_output {
        print_json(&report);
    } else {
        println!("metamodel validate {model}");
        println!("  Types: {}", metamodel.len());
        println!("  Result: {}", report.result);
        if !report.failure_classes.is_empty() {
            println!("  Failure classes: {}", report.failure_classes.join(", "));
        }
        for issue in &report.issues {
            println!("  - [{}] {}: {}", issue.failure_class, issue.path, issue.message);
        }
    }

    if fail_on_error && !report.is_accepted() {
        std::process::exit(EXIT_REJECTED);
    }
}
