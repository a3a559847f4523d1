use agil_core::config::ResolvedConfig;
use agil_core::link_policy::{LinkDecision, LinkPolicy};

pub fn run_link(config: &ResolvedConfig, url: &str) {
    let decision = LinkPolicy::from_config(config).decide(url);
    println!("{}", describe(decision));
}

const fn describe(decision: LinkDecision) -> &'static str {
    match decision {
        LinkDecision::LoadInApp => "in-app",
        LinkDecision::OpenExternally => "external",
    }
}
