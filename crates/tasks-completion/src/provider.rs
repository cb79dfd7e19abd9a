//! Turning a document and a cursor into completion items.

use jsonc_tree::{ParseOptions, parse_tree_with};
use tracing::debug;

use crate::classifier::ContextClassifier;
use crate::position::{Position, offset_at};
use crate::snippets::{CAMEL_TASK_SNIPPETS, CompletionItem};

/// Offers a fixed item list when the cursor sits in the array a classifier
/// matches. Holds no per-request state; one instance can serve every
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionProvider {
    classifier: ContextClassifier,
    items: &'static [CompletionItem],
    options: ParseOptions,
}

impl CompletionProvider {
    /// The Camel launcher tasks, offered inside `"tasks": [...]`.
    pub const CAMEL_TASKS: CompletionProvider =
        CompletionProvider::new(ContextClassifier::TASKS, &CAMEL_TASK_SNIPPETS);

    pub const fn new(classifier: ContextClassifier, items: &'static [CompletionItem]) -> Self {
        Self {
            classifier,
            items,
            options: ParseOptions {
                disallow_comments: false,
                allow_trailing_comma: false,
                allow_empty_content: false,
            },
        }
    }

    /// Use different parse options. Only the shape of the tree matters
    /// here, so this rarely changes the outcome.
    pub const fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn classifier(&self) -> ContextClassifier {
        self.classifier
    }

    pub fn items(&self) -> &'static [CompletionItem] {
        self.items
    }

    /// Items for a cursor at `position`.
    pub fn provide_completion_items(
        &self,
        text: &str,
        position: Position,
    ) -> &'static [CompletionItem] {
        self.provide_at_offset(text, offset_at(text, position))
    }

    /// Items for a cursor at byte `offset`; empty when the document has no
    /// tree or the cursor is anywhere but directly in the matching array.
    pub fn provide_at_offset(&self, text: &str, offset: usize) -> &'static [CompletionItem] {
        let parsed = parse_tree_with(text, self.options);
        let Some(tree) = parsed.tree() else {
            debug!(offset, "no syntax tree, nothing to complete");
            return &[];
        };

        let node = tree.find_node_at_offset(offset, false);
        if self.classifier.matches(node) {
            debug!(
                offset,
                property = self.classifier.property(),
                items = self.items.len(),
                "cursor in matching array"
            );
            self.items
        } else {
            &[]
        }
    }
}

impl Default for CompletionProvider {
    fn default() -> Self {
        Self::CAMEL_TASKS
    }
}

/// Camel task items for a cursor at `position` in `text`.
pub fn provide_completion_items(text: &str, position: Position) -> &'static [CompletionItem] {
    CompletionProvider::CAMEL_TASKS.provide_completion_items(text, position)
}

/// Camel task items for a cursor at byte `offset` in `text`.
pub fn provide_at_offset(text: &str, offset: usize) -> &'static [CompletionItem] {
    CompletionProvider::CAMEL_TASKS.provide_at_offset(text, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn complete(marked: &str) -> &'static [CompletionItem] {
        let offset = marked.find('|').expect("cursor marker");
        provide_at_offset(&marked.replacen('|', "", 1), offset)
    }

    fn labels(items: &[CompletionItem]) -> Vec<&'static str> {
        items.iter().map(|item| item.label).collect()
    }

    #[test]
    fn test_scenario_tasks_array() {
        let items = complete(r#"{"tasks": [ | ]}"#);
        assert_eq!(
            labels(items),
            vec![
                "Start Camel application with Maven with camel.debug profile",
                "Start Camel application with Maven Quarkus Dev with camel.debug profile",
                "Start Camel application with JBang with camel-debug",
            ]
        );
    }

    #[test]
    fn test_scenario_other_array() {
        assert!(complete(r#"{"other": [ | ]}"#).is_empty());
    }

    #[test]
    fn test_scenario_inside_task() {
        assert!(complete(r#"{"tasks": [ {"label": "x"| } ]}"#).is_empty());
    }

    #[test]
    fn test_scenario_root_array() {
        assert!(complete("[ | ]").is_empty());
    }

    #[test]
    fn test_items_are_the_static_table() {
        let items = complete(r#"{"tasks": [|]}"#);
        assert!(std::ptr::eq(items, CAMEL_TASK_SNIPPETS.as_slice()));
    }

    #[test]
    fn test_no_tree() {
        assert!(provide_at_offset("", 0).is_empty());
        assert!(provide_at_offset("   ", 1).is_empty());
        assert!(provide_at_offset("}", 0).is_empty());
        assert!(provide_at_offset("// nothing", 4).is_empty());
    }

    #[test]
    fn test_offset_past_document() {
        assert!(provide_at_offset(r#"{"tasks": []}"#, 500).is_empty());
    }

    #[test]
    fn test_by_position() {
        let text = "{\n  \"version\": \"2.0.0\",\n  \"tasks\": [\n    \n  ]\n}\n";
        assert_eq!(provide_completion_items(text, Position::new(3, 4)).len(), 3);
        // On the `"version"` line
        assert!(provide_completion_items(text, Position::new(1, 4)).is_empty());
        // Past the end of the document
        assert!(provide_completion_items(text, Position::new(40, 0)).is_empty());
    }

    #[test]
    fn test_custom_provider() {
        static INPUT: [CompletionItem; 1] = [CompletionItem {
            label: "input",
            documentation: "",
            insert_text: "{}",
        }];
        let provider = CompletionProvider::new(ContextClassifier::for_property("inputs"), &INPUT);
        assert_eq!(provider.provide_at_offset(r#"{"inputs": [ ]}"#, 12), &INPUT[..]);
        assert!(provider.provide_at_offset(r#"{"tasks": [ ]}"#, 11).is_empty());
    }

    #[test]
    fn test_parse_options_are_used() {
        let provider = CompletionProvider::default().with_parse_options(ParseOptions {
            disallow_comments: true,
            ..Default::default()
        });
        // Comments are reported, but the tree still has the array
        assert_eq!(
            provider.provide_at_offset("{\"tasks\": [ /* c */ ]}", 11).len(),
            3
        );
        assert_eq!(provider.items().len(), 3);
        assert_eq!(provider.classifier(), ContextClassifier::TASKS);
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn provider_is_pure(
                source in r#"[{}\[\]:," a-z\n]{0,32}|\{"tasks": \[[ {}\[\]a-z",:]{0,16}\]\}"#,
                cursor in 0usize..40,
            ) {
                let first = provide_at_offset(&source, cursor);
                let second = provide_at_offset(&source, cursor);
                prop_assert_eq!(first, second);
                prop_assert!(first.is_empty() || first.len() == CAMEL_TASK_SNIPPETS.len());
            }
        }
    }
}
