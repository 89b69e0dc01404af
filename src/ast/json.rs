use super::{Ast, NodeId};
use crate::error::Error;
use crate::position::SourceLocation;
use serde::{Deserialize, Serialize};

/// One AST node in the serialized file form:
/// `{text, line, column, children: [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AstNodeJson {
    text: String,
    line: usize,
    column: usize,
    #[serde(default)]
    children: Vec<AstNodeJson>,
}

/// The AST file wrapper: a root node under `"root"` with an optional
/// free-text `"comment"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstFile {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
    pub root: serde_json::Value,
}

fn to_json_node(ast: &Ast, id: NodeId) -> AstNodeJson {
    let loc = ast.location(id);
    AstNodeJson {
        text: ast.text(id).to_string(),
        line: loc.line,
        column: loc.column,
        children: ast.children(id).iter().map(|&c| to_json_node(ast, c)).collect(),
    }
}

fn from_json_node(ast: &mut Ast, parent: Option<NodeId>, node: &AstNodeJson) -> NodeId {
    let location = SourceLocation::new(node.line, node.column);
    let id = match parent {
        None => {
            *ast = Ast::new(node.text.clone(), location);
            ast.root()
        }
        Some(parent) => ast.add_child(parent, node.text.clone(), location),
    };
    for child in &node.children {
        from_json_node(ast, Some(id), child);
    }
    id
}

/// Serializes `ast` into its JSON file form.
pub fn serialize_ast(ast: &Ast) -> serde_json::Value {
    let root_json = to_json_node(ast, ast.root());
    let file = AstFile {
        comment: None,
        root: serde_json::to_value(root_json).expect("AST node serializes to JSON"),
    };
    serde_json::to_value(file).expect("AstFile serializes to JSON")
}

/// Parses an AST file's JSON form back into an [`Ast`].
pub fn deserialize_ast(value: &serde_json::Value) -> Result<Ast, Error> {
    let file: AstFile = serde_json::from_value(value.clone())
        .map_err(|e| Error::config(format!("invalid AST file: {e}")))?;
    let root_node: AstNodeJson = serde_json::from_value(file.root)
        .map_err(|e| Error::config(format!("invalid AST root node: {e}")))?;

    let mut ast = Ast::new("", SourceLocation::START);
    from_json_node(&mut ast, None, &root_node);
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_shape() {
        let mut ast = Ast::new("root", SourceLocation::new(1, 1));
        let r = ast.root();
        let a = ast.add_child(r, "a", SourceLocation::new(1, 2));
        ast.add_child(a, "leaf", SourceLocation::new(1, 3));
        ast.add_child(r, "b", SourceLocation::new(2, 1));

        let json = serialize_ast(&ast);
        let back = deserialize_ast(&json).unwrap();

        assert_eq!(shape(&ast, ast.root()), shape(&back, back.root()));
    }

    fn shape(ast: &Ast, id: NodeId) -> (String, usize, usize, Vec<(String, usize, usize, Vec<String>)>) {
        let loc = ast.location(id);
        let children: Vec<(String, usize, usize, Vec<String>)> = ast
            .children(id)
            .iter()
            .map(|&c| {
                let cloc = ast.location(c);
                (
                    ast.text(c).to_string(),
                    cloc.line,
                    cloc.column,
                    ast.children(c).iter().map(|&gc| ast.text(gc).to_string()).collect(),
                )
            })
            .collect();
        (ast.text(id).to_string(), loc.line, loc.column, children)
    }
}
