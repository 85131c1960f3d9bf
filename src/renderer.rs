// src/renderer.rs

use crate::error::Result;
use crate::layout::LayoutModel;
use handlebars::Handlebars;

const PICTURE: &str = "tikzpicture";

const COMMIT_NODE: &str = "\\node[git_commit] ({{id}}) at ({{x}},{{y}}) {\\verb+{{id}}+};
\\node[git_commit_message,right] (message_{{id}}) at ({{message_x}},{{y}}) {\\verb+{{message}}+};
";

const REF_NODE: &str = "\\node[git_ref] ({{name}}) at ({{x}},{{ref_y}}) {\\verb+{{name}}+};
";

const COMMIT_ARROW: &str = "\\draw[git_arrow] ({{from}}) -- ({{to}});
";

const REF_ARROW: &str = "\\draw[git_ref_arrow] ({{name}}) -- ({{head}});
";

const TIKZ_PICTURE: &str = "\\begin{tikzpicture}

{{#each branches}}
{{> ref_node}}
{{#each commits}}
{{> commit_node}}
{{/each}}

{{/each}}
{{#each branches}}
{{> ref_arrow}}
{{/each}}
{{#each edges}}
{{#if resolved}}
{{> commit_arrow}}
{{/if}}
{{/each}}

\\end{tikzpicture}
";

/// Turns a [`LayoutModel`] into a TikZ picture.
///
/// The picture is assembled from four partials (`commit_node`, `ref_node`,
/// `commit_arrow`, `ref_arrow`) so a replacement main template can reuse them.
/// Output is not escaped; ids and messages land inside `\verb`.
pub struct TikzRenderer {
    registry: Handlebars<'static>,
}

impl TikzRenderer {
    pub fn new() -> Result<Self> {
        Self::with_template(TIKZ_PICTURE)
    }

    pub fn with_template(template: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        registry.register_partial("commit_node", COMMIT_NODE)?;
        registry.register_partial("ref_node", REF_NODE)?;
        registry.register_partial("commit_arrow", COMMIT_ARROW)?;
        registry.register_partial("ref_arrow", REF_ARROW)?;
        registry.register_template_string(PICTURE, template)?;
        Ok(TikzRenderer { registry })
    }

    pub fn render(&self, layout: &LayoutModel) -> Result<String> {
        Ok(self.registry.render(PICTURE, layout)?)
    }
}
