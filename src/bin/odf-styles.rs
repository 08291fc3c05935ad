use std::env;
use std::process::ExitCode;

use odf_styles::{
    import_styles_xml, DocumentKind, DuplicatePolicy, ImportLimits, ImportOptions,
    ImportedStyles, MapperApplier, MemoryStyle, MemoryStyleContainer, MemoryStyleFamilies,
    StyleScope,
};

#[derive(Clone, Debug)]
struct Args {
    path: String,
    options: ImportOptions,
    apply: bool,
}

fn usage() -> &'static str {
    "usage: odf-styles <styles.xml> [--drawing] [--embedded] [--reject-duplicates] [--apply]"
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return Err(usage().to_string());
    }
    let mut cfg = Args {
        path: args[1].clone(),
        options: ImportOptions::default(),
        apply: false,
    };
    for arg in &args[2..] {
        match arg.as_str() {
            "--drawing" => {
                cfg.options = cfg.options.with_document_kind(DocumentKind::Drawing);
            }
            "--embedded" => {
                cfg.options = cfg.options.with_limits(ImportLimits::embedded());
            }
            "--reject-duplicates" => {
                cfg.options = cfg.options.with_duplicate_policy(DuplicatePolicy::Reject);
            }
            "--apply" => cfg.apply = true,
            other => return Err(format!("unknown argument: {}\n{}", other, usage())),
        }
    }
    Ok(cfg)
}

fn print_summary(styles: &ImportedStyles) {
    for (scope, collection) in [
        (StyleScope::Named, &styles.named),
        (StyleScope::Automatic, &styles.automatic),
    ] {
        println!("{:?} styles: {}", scope, collection.len());
        for record in collection.records() {
            let parent = record.parent_name.as_deref().unwrap_or("-");
            println!(
                "  {:<14} {:<32} parent={} properties={}",
                record.family.markup_name(),
                record.name,
                parent,
                record.properties().len()
            );
        }
        for style in collection.number_styles() {
            println!("  data-style     {:<32} {:?} key={}", style.name, style.format_code, style.key);
        }
    }
    println!("page layouts:");
    for (name, kind) in styles.page_layouts() {
        println!("  {:<32} {} ({})", name, kind, kind.code());
    }
    println!("master pages:");
    for master in &styles.master_pages {
        println!(
            "  {:<32} layout={} handout={}",
            master.display_name,
            master.page_layout_name.as_deref().unwrap_or("-"),
            master.is_handout
        );
    }
}

fn apply(styles: &mut ImportedStyles) {
    let mut families = MemoryStyleFamilies::new()
        .with_family("graphics", MemoryStyleContainer::new(MemoryStyle::open()))
        .with_family("cell", MemoryStyleContainer::new(MemoryStyle::open()));
    for master in &styles.master_pages {
        if !master.is_handout && !master.name.is_empty() {
            families.add_family(
                master.display_name.clone(),
                MemoryStyleContainer::new(MemoryStyle::open()),
            );
        }
    }
    let report = styles.apply(&mut families, &MapperApplier);
    println!(
        "applied: created={} updated={} parented={} warnings={}",
        report.created,
        report.updated,
        report.parented,
        report.warnings.len()
    );
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
    let names: Vec<String> = families.family_names().map(str::to_string).collect();
    for family_name in names {
        let Some(container) = families.family(&family_name) else {
            continue;
        };
        println!("family {} ({} styles)", family_name, container.len());
        for name in container.names() {
            let Some(style) = container.get(name) else {
                continue;
            };
            println!("  {}", name);
            for (key, value) in style.direct_properties() {
                println!("    {} = {}", key, value);
            }
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_args(env::args().collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };
    let bytes = match std::fs::read(&args.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("failed to read {}: {}", args.path, err);
            return ExitCode::FAILURE;
        }
    };
    let mut styles = match import_styles_xml(&bytes, args.options) {
        Ok(styles) => styles,
        Err(err) => {
            eprintln!("import failed: {}", err);
            return ExitCode::FAILURE;
        }
    };
    print_summary(&styles);
    if args.apply {
        apply(&mut styles);
    }
    ExitCode::SUCCESS
}
