//! The grammar: production text in the `LHS -> sym sym sym` shape (§6
//! "Table loader" describes the same textual convention for supplying
//! production text alongside a loaded ACTION/GOTO table), an empty RHS
//! spelled `Lambda`, and the concrete Boreal production list.
//!
//! Production 0 is always the augmented start `S' -> <real start symbol>`,
//! synthesised here rather than written in the text, exactly as §4.3
//! describes: "Production 0 is the augmented start; productions 1..N
//! drive semantic actions 1..N."

use crate::symbol::{looks_like_nonterminal, GSym};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
pub struct Production {
    pub lhs: u16,
    pub rhs: Vec<GSym>,
}

pub struct Grammar {
    pub terminals: Vec<String>,
    pub nonterminals: Vec<String>,
    pub productions: Vec<Production>,
    /// Non-terminal id of the real (pre-augmentation) start symbol.
    pub start: u16,
    pub eof: u16,
}

impl Grammar {
    pub fn terminal_id(&self, name: &str) -> Option<u16> {
        self.terminals.iter().position(|t| t == name).map(|i| i as u16)
    }

    pub fn nonterminal_name(&self, id: u16) -> &str {
        &self.nonterminals[id as usize]
    }

    pub fn terminal_name(&self, id: u16) -> &str {
        &self.terminals[id as usize]
    }

    /// The augmented start non-terminal `S'`, always the highest
    /// non-terminal id (added after every other non-terminal is interned).
    pub fn augmented_start(&self) -> u16 {
        (self.nonterminals.len() - 1) as u16
    }

    /// Parses `LHS -> sym sym sym` production lines (blank lines and
    /// lines starting with `#` are ignored), then appends the augmented
    /// start production `S' -> <first LHS seen>`.
    pub fn from_text(text: &str) -> Grammar {
        let mut terminals: Vec<String> = vec!["eof".to_string()];
        let mut nonterminals: Vec<String> = Vec::new();
        let mut terminal_ids: FxHashMap<String, u16> =
            FxHashMap::from_iter([("eof".to_string(), 0u16)]);
        let mut nonterminal_ids: FxHashMap<String, u16> = FxHashMap::default();
        let mut productions = Vec::new();
        let mut start_name: Option<String> = None;

        fn intern_nonterminal(
            name: &str,
            nonterminals: &mut Vec<String>,
            ids: &mut FxHashMap<String, u16>,
        ) -> u16 {
            if let Some(&id) = ids.get(name) {
                return id;
            }
            let id = nonterminals.len() as u16;
            nonterminals.push(name.to_string());
            ids.insert(name.to_string(), id);
            id
        }

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (lhs_text, rhs_text) = line
                .split_once("->")
                .unwrap_or_else(|| panic!("malformed production line: {line:?}"));
            let lhs_text = lhs_text.trim();
            if start_name.is_none() {
                start_name = Some(lhs_text.to_string());
            }
            let lhs = intern_nonterminal(lhs_text, &mut nonterminals, &mut nonterminal_ids);

            let mut rhs = Vec::new();
            for tok in rhs_text.split_whitespace() {
                if tok == "Lambda" {
                    continue;
                }
                if looks_like_nonterminal(tok) {
                    rhs.push(GSym::NonTerminal(intern_nonterminal(
                        tok,
                        &mut nonterminals,
                        &mut nonterminal_ids,
                    )));
                } else {
                    let id = *terminal_ids.entry(tok.to_string()).or_insert_with(|| {
                        let id = terminals.len() as u16;
                        terminals.push(tok.to_string());
                        id
                    });
                    rhs.push(GSym::Terminal(id));
                }
            }
            productions.push(Production { lhs, rhs });
        }

        let start_name = start_name.expect("grammar text must contain at least one production");
        let start = nonterminal_ids[&start_name];
        let augmented = intern_nonterminal("S'", &mut nonterminals, &mut nonterminal_ids);
        productions.insert(
            0,
            Production {
                lhs: augmented,
                rhs: vec![GSym::NonTerminal(start)],
            },
        );

        Grammar {
            terminals,
            nonterminals,
            productions,
            start,
            eof: 0,
        }
    }
}

/// The Boreal production list (§4.3). Terminal spellings match exactly
/// what [`crate::terminal::terminal_name`] derives from a lexer token, so
/// the driver can look up `ACTION[state, terminal_id]` straight off the
/// token stream.
pub const BOREAL_GRAMMAR: &str = "
Program -> ProgramHeader DeclList ScopeBody begin StmtList end ;
ProgramHeader -> program identifier ;

# `ScopeBody` carries no symbols; its sole job is to give the dangling-else-
# style header/body split a reduce point that lands exactly on the `begin`
# lookahead, so the declaration-mode-false toggle (spec 4.4(1)) runs before
# the lexer ever sees the first identifier inside the body.
ScopeBody -> Lambda

DeclList -> DeclList Decl
DeclList -> Lambda
Decl -> VarDecl
Decl -> ProcDecl
Decl -> FuncDecl

VarDecl -> var IdentList : TypeName ;
IdentList -> IdentList , identifier
IdentList -> identifier
TypeName -> integer
TypeName -> boolean
TypeName -> string
TypeName -> real
TypeName -> char

ProcDecl -> ProcHeader DeclList ScopeBody begin StmtList end ;
ProcHeader -> ProcName ( ParamList ) ;
ProcName -> procedure identifier

FuncDecl -> FuncHeader DeclList ScopeBody begin StmtList end ;
FuncHeader -> FuncName ( ParamList ) : TypeName ;
FuncName -> function identifier

ParamList -> ParamListNonEmpty
ParamList -> Lambda
ParamListNonEmpty -> ParamListNonEmpty , Param
ParamListNonEmpty -> Param
Param -> var identifier : TypeName
Param -> identifier : TypeName

StmtList -> StmtList Stmt ;
StmtList -> Lambda
Stmt -> begin StmtList end
Stmt -> AssignStmt
Stmt -> CallStmt
Stmt -> IfStmt
Stmt -> WhileStmt
Stmt -> RepeatStmt
Stmt -> ForStmt
Stmt -> CaseStmt
Stmt -> LoopStmt
Stmt -> ExitStmt
Stmt -> ReturnStmt
Stmt -> WriteStmt
Stmt -> WritelnStmt
Stmt -> ReadStmt

AssignStmt -> identifier := Expr
CallStmt -> identifier ( ArgList )
ArgList -> ArgListNonEmpty
ArgList -> Lambda
ArgListNonEmpty -> ArgListNonEmpty , Expr
ArgListNonEmpty -> Expr

IfStmt -> if Expr then Stmt
IfStmt -> if Expr then Stmt else Stmt
WhileStmt -> while Expr do Stmt
RepeatStmt -> repeat StmtList until Expr
ForStmt -> for identifier := Expr to Expr do Stmt
CaseStmt -> case Expr of CaseArmList end
CaseStmt -> case Expr of CaseArmList otherwise StmtList end
CaseArmList -> CaseArmList CaseArm
CaseArmList -> CaseArm
CaseArm -> integer_literal : Stmt ;
LoopStmt -> loop StmtList end
ExitStmt -> exit when Expr
ExitStmt -> exit
ReturnStmt -> return Expr
ReturnStmt -> return
WriteStmt -> write ( ArgList )
WritelnStmt -> writeln ( ArgList )
ReadStmt -> read ( ArgListNonEmpty )

Expr -> Expr or Term1
Expr -> Expr xor Term1
Expr -> Term1
Term1 -> Term1 and Term2
Term1 -> Term2
Term2 -> Term3 RelOp Term3
Term2 -> Term3 in ListLit
Term2 -> Term3
RelOp -> =
RelOp -> <>
RelOp -> <
RelOp -> <=
RelOp -> >
RelOp -> >=
Term3 -> Term3 + Term4
Term3 -> Term3 - Term4
Term3 -> Term4
Term4 -> Term4 * Term5
Term4 -> Term4 / Term5
Term4 -> Term4 mod Term5
Term4 -> Term5
Term5 -> Factor ** Term5
Term5 -> Factor
Factor -> ( Expr )
Factor -> identifier
Factor -> identifier ( ArgList )
Factor -> integer_literal
Factor -> string_literal
Factor -> true
Factor -> false
Factor -> - Factor
Factor -> + Factor
Factor -> not Factor
Factor -> max ( ExprList )
Factor -> min ( ExprList )
ListLit -> ( ExprList )
ExprList -> ExprList , Expr
ExprList -> Expr
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_productions_and_adds_the_augmented_start() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        assert_eq!(g.productions[0].lhs, g.augmented_start());
        assert_eq!(g.productions[0].rhs, vec![GSym::NonTerminal(g.start)]);
        assert_eq!(g.nonterminal_name(g.start), "Program");
    }

    #[test]
    fn lambda_productions_have_an_empty_rhs() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        let decl_list_empty = g
            .productions
            .iter()
            .find(|p| g.nonterminal_name(p.lhs) == "DeclList" && p.rhs.is_empty());
        assert!(decl_list_empty.is_some());
    }

    #[test]
    fn terminal_spellings_round_trip() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        assert!(g.terminal_id("program").is_some());
        assert!(g.terminal_id(":=").is_some());
        assert!(g.terminal_id("mod").is_some());
        assert_eq!(g.terminal_id("eof"), Some(0));
    }
}
