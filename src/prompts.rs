pub const DIAGNOSE: &str = include_str!("../data/prompts/diagnose.txt");
pub const TREATMENT: &str = include_str!("../data/prompts/treatment.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Disease: {{disease_name}}.", &[("disease_name", "rust")]),
            "Disease: rust."
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} and {{b}}", &[("a", "cats")]), "cats and {{b}}");
    }

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!DIAGNOSE.is_empty());
        assert!(!TREATMENT.is_empty());
    }

    #[test]
    fn test_treatment_has_disease_placeholder() {
        assert!(TREATMENT.contains("{{disease_name}}"));
    }

    #[test]
    fn test_prompts_name_output_fields() {
        assert!(DIAGNOSE.contains("\"diagnosis\""));
        assert!(DIAGNOSE.contains("\"treatment\""));
        assert!(TREATMENT.contains("\"treatmentRecommendations\""));
    }
}
