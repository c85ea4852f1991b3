//! Built-in settings schema.

use awb_core::{FieldDefinition, OptionStore, Schema, Section};

use crate::hooks::HookRegistry;
use crate::html::{esc_attr, esc_html};
use crate::target_snippet::SHORTCODE_TAG;

/// Id of the built-in section.
pub const STANDARD_SECTION: &str = "standard";

/// Id of the built-in API key field.
pub const API_KEY_FIELD: &str = "api_key";

const BUTTON_TARGET_EXAMPLE: &str = "<!-- Begin Accessible Web A11Y Center Button Target Snippet -->
<div data-awam-target style=\"display:none;\"></div>
<!-- End Accessible Web A11Y Center Button Target Snippet -->";

const TEXT_TARGET_EXAMPLE: &str = "<!-- Begin Accessible Web A11Y Center Text Only Target Snippet -->
<a href=\"#\" data-awam-target>View Accessibility Policy</a>
<!-- End Accessible Web A11Y Center Text Only Target Snippet -->";

/// Name of the filter applied to the built schema.
pub fn schema_filter_name(token: &str) -> String {
    format!("{}_settings_fields", token)
}

/// Build the settings schema and pass it through `<token>_settings_fields`.
///
/// The built-in schema has one `standard` section holding the API key
/// field. No validator is attached, so the key is stored as submitted.
pub fn build_settings_schema(
    token: &str,
    prefix: &str,
    store: &dyn OptionStore,
    hooks: &HookRegistry,
) -> Schema {
    let api_key_option = format!("{}{}", prefix, API_KEY_FIELD);
    let api_key = match store.get(&api_key_option) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to read option '{}': {}", api_key_option, e);
            None
        }
    };

    let standard = Section::new(STANDARD_SECTION, "Settings")
        .with_description(standard_description(token, api_key.as_deref()))
        .with_field(
            FieldDefinition::new(API_KEY_FIELD, "API Key", "text")
                .with_description("Your api key from Accessible Web RAMP.")
                .with_default("")
                .with_placeholder("Enter your API key"),
        );

    let mut schema = Schema::new();
    schema.insert(standard);

    let schema = hooks.schema_filters().apply(&schema_filter_name(token), schema);
    tracing::debug!("Built settings schema with sections {:?}", schema.ids());
    schema
}

fn standard_description(token: &str, api_key: Option<&str>) -> String {
    let mut html = String::new();

    html.push_str(
        "<p>To get started simply add your api key from your website in Accessible Web RAMP and save! \
         <a href=\"https://accessibleweb.com/how-to-find-your-api-key/\" target=\"_blank\" rel=\"noreferrer\">\
         Learn how to find your api key here.</a></p>\n",
    );

    if let Some(api_key) = api_key {
        html.push_str(&format!(
            "<p>The button will embed your accessibility center into your website. You can \
             <a href=\"https://ramp.accessibleweb.com/a11ycenter/{}/\" target=\"_blank\" rel=\"noreferrer\">\
             review your accessibility center</a> if you'd like to verify its appearance.</p>\n",
            esc_attr(api_key)
        ));
    }

    html.push_str(
        "<a href=\"#\" role=\"button\" data-aweb-accordion aria-expanded=\"false\" \
         aria-controls=\"advanced-installation-options\">Show Advanced Installation Options</a>\n",
    );
    html.push_str("<div style=\"display:none;\" id=\"advanced-installation-options\">\n");

    html.push_str("<h3>Website Target Snippet</h3>\n");
    html.push_str(
        "<p>This snippet is <b>optional</b>, and used alongside the previous snippet. \
         It allows you to place the button in a specific location on the page.</p>\n",
    );
    push_code_example(&mut html, BUTTON_TARGET_EXAMPLE, true);
    html.push_str("<p>To embed this as a simple shortcode use:</p>\n");
    push_code_example(&mut html, &format!("[{}]", SHORTCODE_TAG), false);

    html.push_str("<h3>Text Only Button Snippet</h3>\n");
    html.push_str(
        "<p>This snippet is also <strong>optional</strong>, and can be used in place of the previous snippet. \
         It allows you to embed a text-only link on your website instead of the standard button. \
         This will allow you to show a link to your accessibility center that matches your websites styles.</p>\n",
    );
    push_code_example(&mut html, TEXT_TARGET_EXAMPLE, true);
    html.push_str("<p>To embed this as a simple shortcode use:</p>\n");
    push_code_example(
        &mut html,
        &format!(
            "[{tag}]View our Accessibility Center[/{tag}]",
            tag = SHORTCODE_TAG
        ),
        false,
    );
    html.push_str(
        "<p>You may feel free to edit the content inside of the link however you like, \
         but <strong>be sure to follow accessibility best practices!</strong></p>\n",
    );
    html.push_str("</div> <!-- #advanced-installation-options -->\n");

    html.push_str(&accordion_script(token));
    html
}

fn push_code_example(html: &mut String, code: &str, inline_block: bool) {
    let style = if inline_block {
        " style=\"display:inline-block;\""
    } else {
        ""
    };
    html.push_str(&format!("<pre><code{}>{}</code></pre>\n", style, esc_html(code)));
}

fn accordion_script(token: &str) -> String {
    format!(
        r#"<script type="text/javascript">
var awebSettings = document.getElementById('{token}_settings');

function accordionTrigger(event) {{
    if (!event.target.hasAttribute('data-aweb-accordion')) return;
    if (!/click|keydown/.test(event.type)) return;
    if (event.type === 'keydown' && event.code !== 'Space') return;
    event.preventDefault();

    var accordion = awebSettings.querySelector('#' + event.target.getAttribute('aria-controls'));
    if (!accordion) return;

    var expanded = event.target.getAttribute('aria-expanded') === 'true';
    accordion.style.display = expanded ? 'none' : 'block';
    event.target.setAttribute('aria-expanded', expanded ? 'false' : 'true');
}}

awebSettings.addEventListener('click', accordionTrigger);
awebSettings.addEventListener('keydown', accordionTrigger);
</script>
"#,
        token = esc_attr(token)
    )
}
