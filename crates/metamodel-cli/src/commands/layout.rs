use crate::support::{build_metamodel_or_exit, print_json};

pub fn run(model: String, type_name: String, config: Option<String>, json_output: bool) {
    let metamodel = build_metamodel_or_exit(&model, config.as_deref());
    let Some(layout) = metamodel.layout(&type_name) else {
        eprintln!("error: type {type_name} is not part of the metamodel");
        std::process::exit(1);
    };

    if json_output {
        print_json(&layout);
    } else {
        println!("{}", layout.render_text());
    }
}
