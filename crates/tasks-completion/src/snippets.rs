//! The fixed set of Camel launcher tasks offered inside `"tasks": [...]`.

/// A snippet offered at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionItem {
    /// Text shown in the completion list.
    pub label: &'static str,
    /// Longer description shown next to the list.
    pub documentation: &'static str,
    /// Text inserted verbatim when the item is accepted.
    pub insert_text: &'static str,
}

/// Maven, Maven Quarkus Dev and JBang launchers, in that order.
pub static CAMEL_TASK_SNIPPETS: [CompletionItem; 3] = [
    CompletionItem {
        label: "Start Camel application with Maven with camel.debug profile",
        documentation: "Start Camel application with camel.debug profile. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
        insert_text: include_str!("../snippets/maven.jsonc"),
    },
    CompletionItem {
        label: "Start Camel application with Maven Quarkus Dev with camel.debug profile",
        documentation: "Start Camel application with Maven Quarkus dev and camel.debug profile. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
        insert_text: include_str!("../snippets/maven-quarkus.jsonc"),
    },
    CompletionItem {
        label: "Start Camel application with JBang with camel-debug",
        documentation: "Start debuggable Camel application with JBang. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
        insert_text: include_str!("../snippets/jbang.jsonc"),
    },
];
