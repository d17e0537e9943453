//! Command hierarchy built from parent links.
//!
//! Each [`CommandSchema`] may name a parent handler identity. Schemas with
//! no parent become roots; the rest hang under their parent. Children are
//! ordered by command name, then identity, so the tree is deterministic.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::CommandSchema;

/// Errors raised while linking schemas into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Two schemas share the same handler identity.
    #[error("duplicate handler identity: {0}")]
    DuplicateHandler(String),
    /// A schema names a parent that is not in the set.
    #[error("handler '{handler}' names unknown parent '{parent}'")]
    UnknownParent { handler: String, parent: String },
    /// Parent links loop back on themselves.
    #[error("command cycle detected at path: {0}")]
    CommandCycle(String),
}

/// One command and its subcommands.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode<'a> {
    pub schema: &'a CommandSchema,
    pub children: Vec<CommandNode<'a>>,
}

impl<'a> CommandNode<'a> {
    /// User-facing command name.
    pub fn name(&self) -> &'a str {
        self.schema.command_detail.name()
    }

    /// Finds a direct subcommand by name or alias, ignoring case.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandNode<'a>> {
        self.children.iter().find(|child| {
            child.name().eq_ignore_ascii_case(name)
                || child
                    .schema
                    .command_detail
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }

    /// Number of commands in this subtree, including this one.
    pub fn command_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CommandNode::command_count)
            .sum::<usize>()
    }
}

/// Links schemas into root commands with nested subcommands.
///
/// # Errors
///
/// Returns a [`TreeError`] for duplicate identities, unknown parents, or
/// parent cycles.
///
/// # Examples
///
/// ```
/// use handler_schema_core::*;
///
/// let root = assemble_command(&HandlerDescription::new("App.Root()", "app", "App")).unwrap();
/// let build = assemble_command(
///     &HandlerDescription::new("App.Build()", "build", "App").with_parent("App.Root()"),
/// )
/// .unwrap();
///
/// let schemas = vec![root, build];
/// let roots = build_command_tree(&schemas).unwrap();
/// assert_eq!(roots.len(), 1);
/// assert!(roots[0].find_subcommand("build").is_some());
/// ```
pub fn build_command_tree(schemas: &[CommandSchema]) -> Result<Vec<CommandNode<'_>>, TreeError> {
    let mut by_id: HashMap<&str, &CommandSchema> = HashMap::with_capacity(schemas.len());
    for schema in schemas {
        if by_id.insert(schema.id(), schema).is_some() {
            return Err(TreeError::DuplicateHandler(schema.id().to_string()));
        }
    }

    let mut children: HashMap<&str, Vec<&CommandSchema>> = HashMap::new();
    let mut roots = Vec::new();
    for schema in schemas {
        match schema.parent.as_deref() {
            None => roots.push(schema),
            Some(parent) => {
                if !by_id.contains_key(parent) {
                    return Err(TreeError::UnknownParent {
                        handler: schema.id().to_string(),
                        parent: parent.to_string(),
                    });
                }
                children.entry(parent).or_default().push(schema);
            }
        }
    }

    for schema in schemas {
        check_ancestry(schema, &by_id)?;
    }

    sort_siblings(&mut roots);
    for siblings in children.values_mut() {
        sort_siblings(siblings);
    }

    Ok(roots
        .into_iter()
        .map(|schema| link(schema, &children))
        .collect())
}

fn check_ancestry(schema: &CommandSchema, by_id: &HashMap<&str, &CommandSchema>) -> Result<(), TreeError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut path = vec![schema.command_detail.name().to_string()];
    seen.insert(schema.id());

    let mut current = schema;
    while let Some(parent) = current.parent.as_deref() {
        let Some(next) = by_id.get(parent) else {
            break;
        };
        path.push(next.command_detail.name().to_string());
        if !seen.insert(next.id()) {
            path.reverse();
            return Err(TreeError::CommandCycle(path.join(" ")));
        }
        current = *next;
    }
    Ok(())
}

fn sort_siblings(siblings: &mut [&CommandSchema]) {
    siblings.sort_by(|a, b| {
        a.command_detail
            .name()
            .cmp(b.command_detail.name())
            .then_with(|| a.id().cmp(b.id()))
    });
}

fn link<'a>(schema: &'a CommandSchema, children: &HashMap<&str, Vec<&'a CommandSchema>>) -> CommandNode<'a> {
    let kids = children
        .get(schema.id())
        .map(|kids| kids.iter().map(|child| link(*child, children)).collect())
        .unwrap_or_default();
    CommandNode {
        schema,
        children: kids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerDescription, Marker, assemble_command};

    fn schema(id: &str, name: &str, parent: Option<&str>) -> CommandSchema {
        let mut handler = HandlerDescription::new(id, name, "App");
        if let Some(parent) = parent {
            handler = handler.with_parent(parent);
        }
        assemble_command(&handler).unwrap()
    }

    #[test]
    fn test_children_sorted_by_name() {
        let schemas = vec![
            schema("root", "app", None),
            schema("push", "push", Some("root")),
            schema("add", "add", Some("root")),
            schema("remote-add", "add", Some("push")),
        ];
        let roots = build_command_tree(&schemas).unwrap();
        assert_eq!(roots.len(), 1);
        let names: Vec<_> = roots[0].children.iter().map(CommandNode::name).collect();
        assert_eq!(names, vec!["Add", "Push"]);
        assert_eq!(roots[0].command_count(), 4);
        assert_eq!(roots[0].children[1].children[0].schema.id(), "remote-add");
    }

    #[test]
    fn test_find_subcommand_matches_alias() {
        let mut handler = HandlerDescription::new("status", "status", "App").with_parent("root");
        handler.markers.push(Marker::new("Aliases").with_values(["st"]));
        let schemas = vec![schema("root", "app", None), assemble_command(&handler).unwrap()];
        let roots = build_command_tree(&schemas).unwrap();
        assert!(roots[0].find_subcommand("st").is_some());
        assert!(roots[0].find_subcommand("STATUS").is_some());
        assert!(roots[0].find_subcommand("commit").is_none());
    }

    #[test]
    fn test_unknown_parent() {
        let schemas = vec![schema("child", "child", Some("missing"))];
        assert_eq!(
            build_command_tree(&schemas),
            Err(TreeError::UnknownParent {
                handler: "child".to_string(),
                parent: "missing".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_handler() {
        let schemas = vec![schema("a", "a", None), schema("a", "b", None)];
        assert_eq!(
            build_command_tree(&schemas),
            Err(TreeError::DuplicateHandler("a".to_string()))
        );
    }

    #[test]
    fn test_cycle_detected() {
        let schemas = vec![
            schema("a", "alpha", Some("b")),
            schema("b", "beta", Some("a")),
        ];
        assert_eq!(
            build_command_tree(&schemas),
            Err(TreeError::CommandCycle("Alpha Beta Alpha".to_string()))
        );
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let schemas = vec![schema("a", "alpha", Some("a"))];
        assert!(matches!(
            build_command_tree(&schemas),
            Err(TreeError::CommandCycle(_))
        ));
    }
}
