use crate::commands::{CmdMessage, CmdResult};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::paths::PathResolver;

/// Resolves each logical path; with no input, resolves the uploads folder.
pub fn resolve(resolver: &PathResolver, api: &ApiConfig, inputs: &[String]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if inputs.is_empty() {
        return Ok(result.with_paths(vec![resolver.uploads_dir(api)]));
    }
    for input in inputs {
        if !resolver.is_contained(input) {
            result.add_message(CmdMessage::warning(format!(
                "{} resolves outside {}",
                input,
                resolver.root().display()
            )));
        }
    }
    Ok(result.with_paths(inputs.iter().map(|p| resolver.resolve(p)).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolver() -> PathResolver {
        PathResolver::new(None, "/srv/app")
    }

    #[test]
    fn resolves_inputs_in_order() {
        let res = resolve(
            &resolver(),
            &ApiConfig::default(),
            &["~/a".to_string(), "/b".to_string()],
        )
        .unwrap();
        assert_eq!(
            res.paths,
            vec![PathBuf::from("/srv/app/a"), PathBuf::from("/srv/app/b")]
        );
        assert!(res.messages.is_empty());
    }

    #[test]
    fn no_input_gives_uploads_dir() {
        let res = resolve(&resolver(), &ApiConfig::default(), &[]).unwrap();
        assert_eq!(res.paths, vec![PathBuf::from("/srv/app/uploads")]);
    }

    #[test]
    fn climbing_paths_warn() {
        let res = resolve(&resolver(), &ApiConfig::default(), &["../etc".to_string()]).unwrap();
        assert_eq!(res.messages.len(), 1);
    }
}
