//! Property tests for proxy template rendering.

use proptest::prelude::*;

use berth::domain::services::{render, TemplateVars};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Rendering never panics, whatever the template text.
    #[test]
    fn property_render_never_panics(template in "(?s).{0,400}") {
        let vars = TemplateVars::new().set("primary_domain", "example.com");
        let _ = render(&template, &vars);
    }

    /// PROPERTY: Text without placeholders is copied byte for byte.
    #[test]
    fn property_plain_text_is_untouched(template in "[^{]{0,400}") {
        let rendered = render(&template, &TemplateVars::new()).unwrap();
        prop_assert_eq!(rendered, template);
    }
}
