//! Accessible role + name locator
//!
//! Finds elements the way assistive technology would address them: by
//! semantic role (native tag or explicit `role` attribute) and by exact,
//! whitespace-normalized accessible name.

use chromiumoxide::Page;
use serde::Deserialize;
use tracing::debug;

use super::error::{BrowserError, BrowserResult};
use super::wait::{poll_until, WaitConfig};

/// Native elements carrying each supported implicit role
const IMPLICIT_ROLES: &[(&str, &str)] = &[
    ("heading", "h1, h2, h3, h4, h5, h6"),
    ("link", "a[href], area[href]"),
    ("button", "button, input[type=button], input[type=submit], input[type=reset]"),
];

/// Probe body; `__ROLE__`, `__NAME__` and `__IMPLICIT__` are JSON literals.
const PROBE_SCRIPT: &str = r#"(function () {
  var role = __ROLE__;
  var name = __NAME__;
  var implicit = __IMPLICIT__;
  function norm(s) { return (s || '').replace(/\s+/g, ' ').trim(); }
  function accessibleName(el) {
    var label = norm(el.getAttribute('aria-label'));
    if (label) { return label; }
    var ids = el.getAttribute('aria-labelledby');
    if (ids) {
      var text = norm(ids.split(/\s+/).map(function (id) {
        var target = document.getElementById(id);
        return target ? target.textContent : '';
      }).join(' '));
      if (text) { return text; }
    }
    return norm(el.textContent);
  }
  function isVisible(el) {
    var rect = el.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) { return false; }
    var style = window.getComputedStyle(el);
    return style.visibility !== 'hidden' && style.display !== 'none';
  }
  var selector = '[role="' + role + '"]' + (implicit ? ', ' + implicit : '');
  var wanted = norm(name);
  var matches = Array.prototype.filter.call(document.querySelectorAll(selector), function (el) {
    var explicit = norm(el.getAttribute('role')).split(' ')[0];
    return (!explicit || explicit === role) && accessibleName(el) === wanted;
  });
  return { matches: matches.length, visible: matches.some(isVisible) };
})()"#;

/// Result of one locator probe
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LocatorProbe {
    /// Elements with the role and exact name
    pub matches: usize,
    /// Whether any of them is rendered and visible
    pub visible: bool,
}

/// Locates an element by accessible role and exact accessible name
#[derive(Clone, Debug)]
pub struct RoleLocator {
    role: String,
    name: String,
    wait: WaitConfig,
}

impl RoleLocator {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
            wait: WaitConfig::default(),
        }
    }

    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// JavaScript expression evaluating to a [`LocatorProbe`]
    pub fn script(&self) -> String {
        let implicit = IMPLICIT_ROLES
            .iter()
            .find(|(role, _)| *role == self.role)
            .map(|(_, selector)| *selector);

        PROBE_SCRIPT
            .replace("__ROLE__", &js_literal(&self.role))
            .replace("__NAME__", &js_literal(&self.name))
            .replace("__IMPLICIT__", &js_literal(&implicit))
    }

    /// Evaluate the locator once against the current document
    pub async fn probe(&self, page: &Page) -> BrowserResult<LocatorProbe> {
        let result = page.evaluate_expression(self.script()).await?;
        result
            .into_value::<LocatorProbe>()
            .map_err(|e| BrowserError::Script(e.to_string()))
    }

    /// Wait until a matching element is visible
    ///
    /// Evaluation errors (for example while the page is still navigating)
    /// count as "not yet visible"; only the timeout ends the wait.
    pub async fn wait_visible(&self, page: &Page) -> BrowserResult<()> {
        let visible = poll_until(&self.wait, || async {
            match self.probe(page).await {
                Ok(probe) => {
                    debug!(
                        "{} \"{}\": {} match(es), visible={}",
                        self.role, self.name, probe.matches, probe.visible
                    );
                    Ok::<_, BrowserError>(probe.visible)
                }
                Err(e) => {
                    debug!("Locator probe failed: {}", e);
                    Ok(false)
                }
            }
        })
        .await?;

        if visible {
            Ok(())
        } else {
            Err(BrowserError::ElementTimeout {
                role: self.role.clone(),
                name: self.name.clone(),
                timeout_ms: self.wait.timeout.as_millis() as u64,
            })
        }
    }
}

/// Encode a value as a JavaScript literal
fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    // JSON is valid JS except for the two line separators
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_embeds_role_and_name() {
        let locator = RoleLocator::new("heading", "أهلاً بك في مكتبة تفانين");
        let script = locator.script();
        assert!(script.contains(r#"var role = "heading";"#));
        assert!(script.contains(r#"var name = "أهلاً بك في مكتبة تفانين";"#));
        assert!(script.contains(r#"var implicit = "h1, h2, h3, h4, h5, h6";"#));
        assert!(!script.contains("__"));
    }

    #[test]
    fn test_script_escapes_quotes() {
        let locator = RoleLocator::new("heading", r#"Say "hi" \ now"#);
        assert!(locator
            .script()
            .contains(r#"var name = "Say \"hi\" \\ now";"#));
    }

    #[test]
    fn test_link_role_matches_anchors() {
        let script = RoleLocator::new("link", "Catalog").script();
        assert!(script.contains(r#"var implicit = "a[href], area[href]";"#));
    }

    #[test]
    fn test_button_role_matches_inputs() {
        let script = RoleLocator::new("button", "Search").script();
        assert!(script.contains(
            r#"var implicit = "button, input[type=button], input[type=submit], input[type=reset]";"#
        ));
    }

    #[test]
    fn test_unknown_role_has_no_implicit_selector() {
        let script = RoleLocator::new("banner", "Top").script();
        assert!(script.contains("var implicit = null;"));
    }

    #[test]
    fn test_probe_deserializes() {
        let probe: LocatorProbe =
            serde_json::from_value(serde_json::json!({"matches": 2, "visible": true})).unwrap();
        assert_eq!(
            probe,
            LocatorProbe {
                matches: 2,
                visible: true
            }
        );
    }

    #[test]
    fn test_js_literal_line_separators() {
        assert_eq!(js_literal("a\u{2028}b"), "\"a\\u2028b\"");
    }
}
