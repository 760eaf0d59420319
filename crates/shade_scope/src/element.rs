//! The scope element
//!
//! A scope element hosts arbitrary markup inside an isolated boundary. At
//! construction it stands the boundary up, injects the configured styles
//! and scripts plus the instance's own script, moves the light content
//! inside, and hands the boundary's first content node to the binding
//! adapter. From then on the controller is driven by the host document's
//! connect/disconnect notifications: attach applies the identity derived
//! from the instance descriptor, detach tears the binding tree down.
//!
//! Everything here degrades rather than fails: a missing boundary or a
//! missing first content node turns the dependent operations into no-ops,
//! and a malformed descriptor is logged and treated as empty. The host
//! never sees an error from this module.

use std::sync::Arc;

use tracing::{debug, warn};

use shade_dom::{Document, NodeId, ShadowMode, Stylesheet};

use crate::binding::BindingAdapter;
use crate::config::ScopeConfig;
use crate::descriptor::{InstanceDescriptor, PROPS_ATTRIBUTE};
use crate::registry::{EntryKind, ScopeRegistry};
use crate::styling::StylingGenerator;

/// The tag scope elements are registered under, one per process
pub const SCOPE_TAG: &str = "shade-scope";

/// Lifecycle of a scope element instance
///
/// `Unattached -> Attached -> Detached -> Attached -> ...`; reinsertion is
/// standard reattachment, never a second construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, not yet in the live document
    Unattached,
    /// In the live document; identity applied, binding tree initialized
    Attached,
    /// Removed from the document; binding tree destroyed
    Detached,
}

/// Builds scope elements against one frozen registry
///
/// Constructed once at startup from the scope configuration; the styling
/// generator is consumed here, once, and never re-invoked per instance.
pub struct ScopeFactory {
    registry: Arc<ScopeRegistry>,
    base_sheet: Option<Arc<Stylesheet>>,
    binding: Arc<dyn BindingAdapter>,
}

impl ScopeFactory {
    pub fn new(
        config: &ScopeConfig,
        generator: &dyn StylingGenerator,
        binding: Arc<dyn BindingAdapter>,
    ) -> Self {
        Self {
            registry: Arc::new(ScopeRegistry::from_config(config)),
            base_sheet: generator.enhancement(&config.styling).map(Arc::new),
            binding,
        }
    }

    /// The shared registry, frozen since construction
    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    /// Register the scope tag with a document
    ///
    /// Re-registration under the same name is a host-environment error and
    /// is surfaced as such.
    pub fn register(&self, doc: &mut Document) -> shade_dom::Result<()> {
        doc.register_tag(SCOPE_TAG)
    }

    /// Construct a scope element controller for a host node
    ///
    /// Runs the whole construction sequence: boundary creation, style and
    /// script injection, content migration, and binding-tree init. The
    /// returned controller is `Unattached` until the host reports insertion.
    pub fn upgrade(&self, doc: &mut Document, host: NodeId) -> ScopeElement {
        if doc.tag(host) != Some(SCOPE_TAG) {
            debug!(tag = ?doc.tag(host), "upgrading a node that does not carry the scope tag");
        }
        let mut element = ScopeElement {
            host,
            registry: Arc::clone(&self.registry),
            binding: Arc::clone(&self.binding),
            state: LifecycleState::Unattached,
            content_root: None,
        };
        element.construct(doc, self.base_sheet.clone());
        element
    }
}

/// Controller for one scope element instance
///
/// Owns its boundary exclusively; instances never touch each other's state.
pub struct ScopeElement {
    host: NodeId,
    registry: Arc<ScopeRegistry>,
    binding: Arc<dyn BindingAdapter>,
    state: LifecycleState,
    /// First element of the migrated content; injected link/script nodes
    /// that precede it in the boundary are not content.
    content_root: Option<NodeId>,
}

impl ScopeElement {
    /// The host node this controller manages
    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The boundary's root content node, if it still exists
    pub fn content_root(&self, doc: &Document) -> Option<NodeId> {
        self.content_root.filter(|&id| doc.node(id).is_some())
    }

    fn construct(&mut self, doc: &mut Document, base_sheet: Option<Arc<Stylesheet>>) {
        if let Err(err) = doc.attach_shadow(self.host, ShadowMode::Open) {
            // Without a boundary every dependent operation below degrades
            // to a no-op; the instance stays usable, just inert.
            warn!(%err, "boundary attachment failed");
        }

        if let Some(sheet) = base_sheet {
            let _ = doc.adopt_stylesheet(self.host, sheet);
        }
        self.inject_instance_script(doc);
        self.inject_registry(doc);

        let moved = doc
            .migrate_children_to_boundary(self.host)
            .unwrap_or_default();
        self.content_root = moved.into_iter().find(|&id| {
            doc.node(id)
                .map(|node| node.as_element().is_some())
                .unwrap_or(false)
        });

        if let Some(first) = self.content_root {
            self.binding.initialize_tree(doc, first);
        }
    }

    /// Inject the descriptor's script, if any
    ///
    /// Parsed independently of attach-time parsing; a failure here is
    /// logged and construction continues without the script.
    fn inject_instance_script(&self, doc: &mut Document) {
        let raw = doc
            .attribute(self.host, PROPS_ATTRIBUTE)
            .map(str::to_owned);
        let descriptor = InstanceDescriptor::parse(raw.as_deref());
        if let Some(code) = descriptor.script {
            let script = doc.create_script(code);
            let _ = doc.append_to_boundary(self.host, script);
        }
    }

    /// Apply registry styles then scripts, in registration order
    fn inject_registry(&self, doc: &mut Document) {
        for entry in self.registry.styles() {
            match entry.kind {
                EntryKind::InlineContent => {
                    let sheet = Arc::new(Stylesheet::compile(entry.content.clone()));
                    let _ = doc.adopt_stylesheet(self.host, sheet);
                }
                EntryKind::RemoteReference => {
                    let link = doc.create_element("link");
                    doc.set_attribute(link, "rel", "stylesheet");
                    doc.set_attribute(link, "href", entry.content.clone());
                    let _ = doc.append_to_boundary(self.host, link);
                }
            }
        }
        for entry in self.registry.scripts() {
            let node = match entry.kind {
                EntryKind::InlineContent => doc.create_script(entry.content.clone()),
                EntryKind::RemoteReference => {
                    let script = doc.create_element("script");
                    doc.set_attribute(script, "src", entry.content.clone());
                    script
                }
            };
            let _ = doc.append_to_boundary(self.host, node);
        }
    }

    /// Host notification: the element entered the live document
    pub fn connected(&mut self, doc: &mut Document) {
        match self.state {
            LifecycleState::Unattached => {
                // The binding tree was initialized during construction.
                self.attach_identity(doc);
                self.state = LifecycleState::Attached;
                debug!(host = ?self.host, "scope element attached");
            }
            LifecycleState::Detached => {
                self.attach_identity(doc);
                if let Some(first) = self.content_root(doc) {
                    self.binding.initialize_tree(doc, first);
                }
                self.state = LifecycleState::Attached;
                debug!(host = ?self.host, "scope element reattached");
            }
            LifecycleState::Attached => {
                debug!(host = ?self.host, "connect notification while already attached");
            }
        }
    }

    /// Host notification: the element left the live document
    pub fn disconnected(&mut self, doc: &mut Document) {
        if self.state != LifecycleState::Attached {
            debug!(host = ?self.host, state = ?self.state, "disconnect notification ignored");
            return;
        }
        if let Some(first) = self.content_root(doc) {
            self.binding.destroy_tree(doc, first);
        }
        self.state = LifecycleState::Detached;
        debug!(host = ?self.host, "scope element detached");
    }

    /// Derive class/id identity from the descriptor and apply it to the
    /// boundary's first content node
    ///
    /// Additive on every attach: classes accumulate across cycles when the
    /// descriptor changes, and the id is overwritten.
    fn attach_identity(&self, doc: &mut Document) {
        let raw = doc
            .attribute(self.host, PROPS_ATTRIBUTE)
            .map(str::to_owned);
        let descriptor = InstanceDescriptor::parse(raw.as_deref());
        let Some(first) = self.content_root(doc) else {
            return;
        };
        if let Some(kind) = &descriptor.kind {
            doc.add_class(first, kind.clone());
        }
        if let Some(id) = &descriptor.id {
            // A missing type degrades the prefix to the literal `undefined`;
            // existing callers key off those ids, so the shape stays.
            let prefix = descriptor.kind.as_deref().unwrap_or("undefined");
            doc.set_attribute(first, "id", format!("{prefix}-{id}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use shade_dom::{NotificationKind, ScriptHost, ScriptSource};

    use crate::binding::NoopBinding;
    use crate::styling::{StaticGenerator, StylingConfig};

    #[derive(Default)]
    struct RecordingBinding {
        events: Mutex<Vec<(&'static str, NodeId)>>,
    }

    impl RecordingBinding {
        fn events(&self) -> Vec<(&'static str, NodeId)> {
            self.events.lock().unwrap().clone()
        }
    }

    impl BindingAdapter for RecordingBinding {
        fn initialize_tree(&self, _doc: &mut Document, root: NodeId) {
            self.events.lock().unwrap().push(("init", root));
        }

        fn destroy_tree(&self, _doc: &mut Document, root: NodeId) {
            self.events.lock().unwrap().push(("destroy", root));
        }
    }

    #[derive(Default)]
    struct RecordingScriptHost {
        sources: Mutex<Vec<ScriptSource>>,
    }

    impl ScriptHost for RecordingScriptHost {
        fn execute(&self, _node: NodeId, source: ScriptSource) {
            self.sources.lock().unwrap().push(source);
        }
    }

    fn setup(config: ScopeConfig) -> (Document, ScopeFactory, Arc<RecordingBinding>) {
        let binding = Arc::new(RecordingBinding::default());
        let factory = ScopeFactory::new(&config, &StaticGenerator::new(""), binding.clone());
        let mut doc = Document::new();
        factory.register(&mut doc).unwrap();
        (doc, factory, binding)
    }

    fn scope_host(doc: &mut Document, props: Option<&str>) -> NodeId {
        let host = doc.create_element(SCOPE_TAG);
        if let Some(props) = props {
            doc.set_attribute(host, PROPS_ATTRIBUTE, props);
        }
        let card = doc.create_element("div");
        let text = doc.create_text("hello");
        doc.append_child(card, text).unwrap();
        doc.append_child(host, card).unwrap();
        host
    }

    #[test]
    fn test_construction_moves_content_into_boundary() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, None);
        let card = doc.children(host)[0];

        let scope = factory.upgrade(&mut doc, host);

        assert!(doc.children(host).is_empty());
        assert_eq!(doc.boundary_children(host), [card]);
        assert_eq!(doc.text_content(card), "hello");
        assert_eq!(binding.events(), [("init", card)]);
        assert_eq!(scope.state(), LifecycleState::Unattached);
    }

    #[test]
    fn test_registry_style_injection_order() {
        let config = ScopeConfig {
            style: vec![
                "https://cdn.example/x.css".to_string(),
                ".btn{color:red}".to_string(),
            ],
            ..ScopeConfig::default()
        };
        let (mut doc, factory, _binding) = setup(config);
        let host = scope_host(&mut doc, None);
        let _scope = factory.upgrade(&mut doc, host);

        // Remote entry became a link child of the boundary.
        let link = doc.boundary_children(host)[0];
        assert_eq!(doc.tag(link), Some("link"));
        assert_eq!(doc.attribute(link, "rel"), Some("stylesheet"));
        assert_eq!(doc.attribute(link, "href"), Some("https://cdn.example/x.css"));

        // Inline entry became an adopted stylesheet.
        let adopted = doc.boundary(host).unwrap().adopted_stylesheets();
        assert_eq!(adopted.len(), 1);
        assert_eq!(adopted[0].source(), ".btn{color:red}");
    }

    #[test]
    fn test_inline_styles_adopt_in_registration_order() {
        let config = ScopeConfig {
            style: vec![".a{}".to_string(), ".b{}".to_string()],
            ..ScopeConfig::default()
        };
        let (mut doc, factory, _binding) = setup(config);
        let host = scope_host(&mut doc, None);
        let _scope = factory.upgrade(&mut doc, host);

        let sources: Vec<&str> = doc
            .boundary(host)
            .unwrap()
            .adopted_stylesheets()
            .iter()
            .map(|sheet| sheet.source())
            .collect();
        assert_eq!(sources, [".a{}", ".b{}"]);
    }

    #[test]
    fn test_base_enhancement_is_adopted_first() {
        let config = ScopeConfig {
            style: vec![".btn{color:red}".to_string()],
            ..ScopeConfig::default()
        };
        let binding = Arc::new(NoopBinding);
        let generator = StaticGenerator::new("*{box-sizing:border-box}");
        let factory = ScopeFactory::new(&config, &generator, binding);
        let mut doc = Document::new();
        factory.register(&mut doc).unwrap();

        let host = scope_host(&mut doc, None);
        let _scope = factory.upgrade(&mut doc, host);

        let sources: Vec<&str> = doc
            .boundary(host)
            .unwrap()
            .adopted_stylesheets()
            .iter()
            .map(|sheet| sheet.source())
            .collect();
        assert_eq!(sources, ["*{box-sizing:border-box}", ".btn{color:red}"]);
    }

    #[test]
    fn test_instance_script_precedes_registry_scripts() {
        let config = ScopeConfig {
            script: vec!["lib()".to_string(), "https://cdn.example/x.js".to_string()],
            ..ScopeConfig::default()
        };
        let (mut doc, factory, _binding) = setup(config);
        let script_host = Arc::new(RecordingScriptHost::default());
        doc.set_script_host(script_host.clone());

        let host = scope_host(&mut doc, Some(r#"{"script":"setup()"}"#));
        let _scope = factory.upgrade(&mut doc, host);

        let sources = script_host.sources.lock().unwrap().clone();
        assert_eq!(
            sources,
            [
                ScriptSource::Inline("setup()".to_string()),
                ScriptSource::Inline("lib()".to_string()),
                ScriptSource::Remote("https://cdn.example/x.js".to_string()),
            ]
        );
    }

    #[test]
    fn test_identity_and_binding_target_content_not_injected_nodes() {
        let config = ScopeConfig {
            style: vec!["https://cdn.example/x.css".to_string()],
            script: vec!["lib()".to_string()],
            ..ScopeConfig::default()
        };
        let (mut doc, factory, binding) = setup(config);
        let host = scope_host(&mut doc, Some(r#"{"type":"card","id":7}"#));
        let card = doc.children(host)[0];
        let mut scope = factory.upgrade(&mut doc, host);
        scope.connected(&mut doc);

        // Injected nodes precede the content in the boundary...
        assert_eq!(doc.tag(doc.boundary_children(host)[0]), Some("link"));
        // ...but identity and binding land on the migrated content root.
        assert_eq!(scope.content_root(&doc), Some(card));
        assert!(doc.has_class(card, "card"));
        assert_eq!(doc.attribute(card, "id"), Some("card-7"));
        assert_eq!(binding.events(), [("init", card)]);
    }

    #[test]
    fn test_identity_attaches_on_connect() {
        let (mut doc, factory, _binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, Some(r#"{"type":"card","id":7}"#));
        let mut scope = factory.upgrade(&mut doc, host);
        let card = doc.boundary_first_element(host).unwrap();

        // Identity is an attach effect, not a construction effect.
        assert!(doc.classes(card).is_empty());

        doc.append_child(doc.root(), host).unwrap();
        scope.connected(&mut doc);

        assert!(doc.has_class(card, "card"));
        assert_eq!(doc.attribute(card, "id"), Some("card-7"));
        assert_eq!(scope.state(), LifecycleState::Attached);
    }

    #[test]
    fn test_malformed_descriptor_degrades_to_empty() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, Some("not json"));
        let mut scope = factory.upgrade(&mut doc, host);
        scope.connected(&mut doc);

        let card = doc.boundary_first_element(host).unwrap();
        assert!(doc.classes(card).is_empty());
        assert_eq!(doc.attribute(card, "id"), None);
        // The instance stays usable: content migrated, binding initialized.
        assert_eq!(doc.text_content(card), "hello");
        assert_eq!(binding.events(), [("init", card)]);
    }

    #[test]
    fn test_detach_destroys_binding_tree_once() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, None);
        let mut scope = factory.upgrade(&mut doc, host);
        let card = doc.boundary_first_element(host).unwrap();

        doc.append_child(doc.root(), host).unwrap();
        scope.connected(&mut doc);
        doc.detach(host).unwrap();
        scope.disconnected(&mut doc);

        assert_eq!(binding.events(), [("init", card), ("destroy", card)]);
        assert_eq!(scope.state(), LifecycleState::Detached);

        // A second disconnect must not destroy again.
        scope.disconnected(&mut doc);
        assert_eq!(binding.events(), [("init", card), ("destroy", card)]);
    }

    #[test]
    fn test_reattachment_reinitializes_the_tree() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, None);
        let mut scope = factory.upgrade(&mut doc, host);
        let card = doc.boundary_first_element(host).unwrap();

        doc.append_child(doc.root(), host).unwrap();
        scope.connected(&mut doc);
        doc.detach(host).unwrap();
        scope.disconnected(&mut doc);
        doc.append_child(doc.root(), host).unwrap();
        scope.connected(&mut doc);

        assert_eq!(
            binding.events(),
            [("init", card), ("destroy", card), ("init", card)]
        );
        assert_eq!(scope.state(), LifecycleState::Attached);
    }

    #[test]
    fn test_id_without_type_keeps_legacy_prefix() {
        let (mut doc, factory, _binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, Some(r#"{"id":7}"#));
        let mut scope = factory.upgrade(&mut doc, host);
        scope.connected(&mut doc);

        let card = doc.boundary_first_element(host).unwrap();
        assert_eq!(doc.attribute(card, "id"), Some("undefined-7"));
    }

    #[test]
    fn test_classes_accumulate_across_cycles() {
        let (mut doc, factory, _binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, Some(r#"{"type":"card","id":1}"#));
        let mut scope = factory.upgrade(&mut doc, host);
        let card = doc.boundary_first_element(host).unwrap();

        scope.connected(&mut doc);
        scope.disconnected(&mut doc);

        // The descriptor changed between cycles; nothing resets the class
        // list, and the id is overwritten.
        doc.set_attribute(host, PROPS_ATTRIBUTE, r#"{"type":"banner","id":2}"#);
        scope.connected(&mut doc);

        assert_eq!(doc.classes(card), ["card", "banner"]);
        assert_eq!(doc.attribute(card, "id"), Some("banner-2"));
    }

    #[test]
    fn test_text_only_content_skips_binding_silently() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = doc.create_element(SCOPE_TAG);
        let text = doc.create_text("plain");
        doc.append_child(host, text).unwrap();

        let mut scope = factory.upgrade(&mut doc, host);
        scope.connected(&mut doc);
        scope.disconnected(&mut doc);

        assert!(binding.events().is_empty());
        assert_eq!(doc.boundary_children(host), [text]);
    }

    #[test]
    fn test_double_connect_has_no_extra_effects() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, Some(r#"{"type":"card"}"#));
        let mut scope = factory.upgrade(&mut doc, host);
        let card = doc.boundary_first_element(host).unwrap();

        scope.connected(&mut doc);
        scope.connected(&mut doc);

        assert_eq!(doc.classes(card), ["card"]);
        assert_eq!(binding.events(), [("init", card)]);
    }

    #[test]
    fn test_tag_registration_is_unique_per_document() {
        let (mut doc, factory, _binding) = setup(ScopeConfig::default());
        assert!(matches!(
            factory.register(&mut doc),
            Err(shade_dom::DomError::TagAlreadyDefined(_))
        ));
    }

    #[test]
    fn test_notifications_drive_the_controller() {
        let (mut doc, factory, binding) = setup(ScopeConfig::default());
        let host = scope_host(&mut doc, Some(r#"{"type":"card"}"#));
        let mut scope = factory.upgrade(&mut doc, host);
        let card = doc.boundary_first_element(host).unwrap();

        doc.append_child(doc.root(), host).unwrap();
        for notification in doc.take_notifications() {
            assert_eq!(notification.node, host);
            match notification.kind {
                NotificationKind::Connected => scope.connected(&mut doc),
                NotificationKind::Disconnected => scope.disconnected(&mut doc),
            }
        }
        assert_eq!(scope.state(), LifecycleState::Attached);
        assert!(doc.has_class(card, "card"));

        doc.detach(host).unwrap();
        for notification in doc.take_notifications() {
            match notification.kind {
                NotificationKind::Connected => scope.connected(&mut doc),
                NotificationKind::Disconnected => scope.disconnected(&mut doc),
            }
        }
        assert_eq!(scope.state(), LifecycleState::Detached);
        assert_eq!(binding.events(), [("init", card), ("destroy", card)]);
    }

    #[test]
    fn test_styling_config_reaches_the_generator() {
        let config = ScopeConfig {
            styling: StylingConfig::new().with("preflight", false),
            ..ScopeConfig::default()
        };
        let generator = StaticGenerator::new("*{box-sizing:border-box}");
        let factory = ScopeFactory::new(&config, &generator, Arc::new(NoopBinding));
        let mut doc = Document::new();
        factory.register(&mut doc).unwrap();

        let host = scope_host(&mut doc, None);
        let _scope = factory.upgrade(&mut doc, host);

        assert!(doc.boundary(host).unwrap().adopted_stylesheets().is_empty());
    }
}
