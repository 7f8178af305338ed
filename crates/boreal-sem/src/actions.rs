//! Semantic actions (4.4): one action per production, dispatched by
//! non-terminal name rather than production number, since the grammar was
//! split (header/body factoring, `ScopeBody` marker, `ProcName`/`FuncName`)
//! well past the original production numbering, and any hardcoded id
//! would silently go stale the next time the grammar text changes.
//!
//! Scope entry/exit and the declaration-mode toggle (4.4(1)) happen here,
//! not in the Lexer: `ProgramHeader`/`ProcName`/`FuncName` call
//! `enterScope`, and `ScopeBody` flips declaration mode off right before
//! `begin`, because both need to fire mid-production, before the body's
//! own declarations and statements are lexed.

use crate::attrs::{Attrs, IdentRef};
use crate::types::{ParamSig, TypeTag};
use boreal_lex::Lexer;
use boreal_parse::SemanticActions;
use boreal_symtab::{DataType, Parameter, SymbolKind};
use boreal_util::{DefId, Diagnostic, Handler, Origin, Span};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Program,
    Procedure,
    Function,
}

/// One subprogram's bookkeeping, pushed at its header and popped at its
/// closing `end ;` (4.4(2)/(3)): the running offset counter used by every
/// declaration and parameter inside it, and its declared return type (for
/// a `Function`'s `return` checks).
struct Frame {
    kind: FrameKind,
    return_type: Option<DataType>,
    offset: u32,
    symbol: Option<DefId>,
}

pub struct Actions<'a> {
    handler: &'a Handler,
    frames: Vec<Frame>,
    program_count: u32,
    next_label: u32,
    occurrences: Vec<crate::tokens::Occurrence>,
}

impl<'a> Actions<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            frames: Vec::new(),
            program_count: 0,
            next_label: 2,
            occurrences: Vec::new(),
        }
    }

    /// Number of `program` headers seen, regardless of whether parsing
    /// went on to succeed — the "exactly one program" check (4.4 Open
    /// Questions) reads this after the parse completes or fails.
    pub fn program_count(&self) -> u32 {
        self.program_count
    }

    pub fn occurrences(&self) -> &[crate::tokens::Occurrence] {
        &self.occurrences
    }

    fn error(&self, span: Span, message: impl Into<String>) {
        self.handler.emit(Diagnostic::error(Origin::Semantic, message, span));
    }

    fn warn(&self, span: Span, message: impl Into<String>) {
        self.handler.emit(Diagnostic::warning(Origin::Semantic, message, span));
    }
}

impl<'a> SemanticActions<Attrs> for Actions<'a> {
    fn token_attribute(&mut self, token: &boreal_lex::Token) -> Attrs {
        let term = Some(boreal_parse::terminal_name(token));
        let mut attrs = Attrs {
            span: token.span,
            term,
            ..Attrs::default()
        };
        match &token.kind {
            boreal_lex::TokenKind::Identifier => {
                attrs.symbol = token.symbol;
                attrs.text = token.lexeme.clone();
                if let Some(id) = token.symbol {
                    self.occurrences.push(crate::tokens::Occurrence {
                        span: token.span,
                        symbol: id,
                    });
                }
            }
            boreal_lex::TokenKind::IntegerLiteral(v) => {
                attrs.int_value = Some(*v);
                attrs.ty = TypeTag::Integer;
            }
            boreal_lex::TokenKind::StringLiteral(s) => {
                attrs.text = s.clone();
                attrs.ty = TypeTag::Str;
            }
            boreal_lex::TokenKind::Keyword(boreal_lex::Keyword::True)
            | boreal_lex::TokenKind::Keyword(boreal_lex::Keyword::False) => {
                attrs.ty = TypeTag::Logical;
            }
            _ => {}
        }
        attrs
    }

    fn reduce(&mut self, production: u32, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        let grammar = boreal_parse::grammar();
        let lhs = grammar.nonterminal_name(grammar.productions[production as usize].lhs);
        self.dispatch(lhs, rhs, lexer)
    }
}

impl<'a> Actions<'a> {
    fn dispatch(&mut self, lhs: &str, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        match lhs {
            "ProgramHeader" => self.program_header(rhs, lexer),
            "ScopeBody" => self.scope_body(lexer),
            "Program" | "ProcDecl" | "FuncDecl" => self.subprogram_end(rhs, lexer),
            "ProcName" => self.begin_subprogram(rhs, lexer, FrameKind::Procedure),
            "FuncName" => self.begin_subprogram(rhs, lexer, FrameKind::Function),
            "ProcHeader" => self.proc_header(rhs, lexer),
            "FuncHeader" => self.func_header(rhs, lexer),
            "DeclList" | "Decl" => passthrough_or_default(rhs),
            "VarDecl" => self.var_decl(rhs, lexer),
            "IdentList" => self.ident_list(rhs),
            "TypeName" => self.type_name(rhs),
            "ParamList" => passthrough_or_default(rhs),
            "ParamListNonEmpty" => self.param_list_nonempty(rhs),
            "Param" => self.param(rhs, lexer),
            "StmtList" => self.stmt_list(rhs),
            "Stmt" => self.stmt(rhs),
            "AssignStmt" => self.assign_stmt(rhs, lexer),
            "CallStmt" => self.call_stmt(rhs, lexer),
            "ArgList" => passthrough_or_default(rhs),
            "ArgListNonEmpty" => self.arg_list_nonempty(rhs),
            "IfStmt" => self.if_stmt(rhs),
            "WhileStmt" => self.while_stmt(rhs),
            "RepeatStmt" => self.repeat_stmt(rhs),
            "ForStmt" => self.for_stmt(rhs, lexer),
            "CaseStmt" => self.case_stmt(rhs),
            "CaseArmList" => self.case_arm_list(rhs),
            "CaseArm" => self.case_arm(rhs),
            "LoopStmt" => self.loop_stmt(rhs),
            "ExitStmt" => self.exit_stmt(rhs),
            "ReturnStmt" => self.return_stmt(rhs),
            "WriteStmt" => self.write_stmt(rhs),
            "WritelnStmt" => self.writeln_stmt(rhs),
            "ReadStmt" => self.read_stmt(rhs),
            "Expr" => self.expr(rhs),
            "Term1" => self.term1(rhs),
            "Term2" => self.term2(rhs),
            "RelOp" => passthrough_or_default(rhs),
            "Term3" => self.additive(rhs),
            "Term4" => self.multiplicative(rhs),
            "Term5" => self.power(rhs),
            "Factor" => self.factor(rhs, lexer),
            "ListLit" => self.list_lit(rhs),
            "ExprList" => self.expr_list(rhs),
            other => panic!("no semantic action registered for non-terminal `{other}`"),
        }
    }

    // ---- Program / procedure / function headers and bodies ----

    fn program_header(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // program identifier ;
        let ident = &rhs[1];
        self.program_count += 1;
        if let Some(id) = ident.symbol {
            let _ = lexer.symtab_mut().set_kind(id, SymbolKind::Program);
            let name = ident.text.clone();
            lexer.symtab_mut().enter_scope(&name);
            self.frames.push(Frame {
                kind: FrameKind::Program,
                return_type: None,
                offset: 0,
                symbol: Some(id),
            });
        } else {
            lexer.symtab_mut().enter_scope("program");
            self.frames.push(Frame {
                kind: FrameKind::Program,
                return_type: None,
                offset: 0,
                symbol: None,
            });
        }
        lexer.set_declaration_mode(true);
        Attrs::default()
    }

    fn scope_body(&mut self, lexer: &mut Lexer) -> Attrs {
        lexer.set_declaration_mode(false);
        Attrs::default()
    }

    fn begin_subprogram(&mut self, rhs: &[Attrs], lexer: &mut Lexer, kind: FrameKind) -> Attrs {
        // procedure identifier  |  function identifier
        let ident = &rhs[1];
        let label = self.next_label;
        self.next_label += 1;
        if let Some(id) = ident.symbol {
            let sym_kind = match kind {
                FrameKind::Procedure => SymbolKind::Procedure,
                FrameKind::Function => SymbolKind::Function,
                FrameKind::Program => unreachable!("headers never begin a Program frame"),
            };
            if let Err(e) = lexer.symtab_mut().set_kind(id, sym_kind) {
                self.error(ident.span, format!("cannot declare '{}': {e}", ident.text));
            }
            lexer.symtab_mut().get_mut(id).label = Some(label);
            let name = ident.text.clone();
            lexer.symtab_mut().enter_scope(&name);
        } else {
            lexer.symtab_mut().enter_scope("<anonymous>");
        }
        self.frames.push(Frame {
            kind,
            return_type: None,
            offset: 0,
            symbol: ident.symbol,
        });
        Attrs {
            symbol: ident.symbol,
            text: ident.text.clone(),
            ..Attrs::default()
        }
    }

    fn attach_params(&mut self, symbol: Option<DefId>, params: &[ParamSig], lexer: &mut Lexer) {
        if let Some(id) = symbol {
            let entry = lexer.symtab_mut().get_mut(id);
            entry.parameters = params
                .iter()
                .map(|p| Parameter {
                    name: p.name.clone(),
                    data_type: p.ty.to_data_type().unwrap_or(DataType::Void),
                    by_reference: p.by_reference,
                })
                .collect();
        }
    }

    fn proc_header(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // ProcName ( ParamList ) ;
        self.attach_params(rhs[0].symbol, &rhs[2].params, lexer);
        Attrs::default()
    }

    fn func_header(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // FuncName ( ParamList ) : TypeName ;
        self.attach_params(rhs[0].symbol, &rhs[2].params, lexer);
        let ret_ty = rhs[5].ty;
        if let Some(id) = rhs[0].symbol {
            lexer.symtab_mut().get_mut(id).return_type = ret_ty.to_data_type();
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.return_type = ret_ty.to_data_type();
        }
        Attrs::default()
    }

    /// Shared by `Program`, `ProcDecl`, and `FuncDecl`: all three share the
    /// `Header DeclList ScopeBody begin StmtList end ;` shape, so the body
    /// end-checks (out-of-loop `exit`, scope/mode restoration) are
    /// identical regardless of which kind of frame is closing.
    fn subprogram_end(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        let body = &rhs[4];
        self.frames.pop().expect("body end without a matching header frame");
        if body.exit_count > 0 {
            let site = body.exit_site.unwrap_or(rhs[3].span);
            self.error(site, "'exit' is not inside a 'loop' or 'repeat' statement");
        }
        lexer.symtab_mut().exit_scope();
        lexer.set_declaration_mode(true);
        Attrs::default()
    }

    // ---- Declarations ----

    fn var_decl(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // var IdentList : TypeName ;
        let ty = rhs[3].ty;
        let data_type = ty.to_data_type().unwrap_or(DataType::Void);
        for ident in &rhs[1].idents {
            if let Some(id) = ident.symbol {
                let offset = {
                    let frame = self.frames.last_mut().expect("declaration outside any scope");
                    let offset = frame.offset;
                    frame.offset += data_type.size();
                    offset
                };
                let _ = lexer.symtab_mut().set_kind(id, SymbolKind::Variable);
                let entry = lexer.symtab_mut().get_mut(id);
                entry.data_type = data_type;
                entry.memory_offset = Some(offset);
            }
        }
        Attrs::default()
    }

    fn ident_list(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 3 {
            // IdentList , identifier
            let mut idents = rhs[0].idents.clone();
            idents.push(IdentRef {
                symbol: rhs[2].symbol,
                span: rhs[2].span,
                text: rhs[2].text.clone(),
            });
            Attrs {
                idents,
                ..Attrs::default()
            }
        } else {
            let ident = &rhs[0];
            Attrs {
                idents: vec![IdentRef {
                    symbol: ident.symbol,
                    span: ident.span,
                    text: ident.text.clone(),
                }],
                ..Attrs::default()
            }
        }
    }

    fn type_name(&mut self, rhs: &[Attrs]) -> Attrs {
        let kw = rhs[0].term.unwrap_or("");
        let ty = match kw {
            "integer" => TypeTag::Integer,
            "boolean" => TypeTag::Logical,
            "string" => TypeTag::Str,
            "real" | "char" => {
                self.warn(rhs[0].span, format!("'{kw}' is a reserved type, not yet supported"));
                TypeTag::None
            }
            _ => TypeTag::None,
        };
        Attrs {
            ty,
            ..Attrs::default()
        }
    }

    fn param_list_nonempty(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 3 {
            let mut params = rhs[0].params.clone();
            params.extend(rhs[2].params.clone());
            Attrs {
                params,
                ..Attrs::default()
            }
        } else {
            rhs[0].clone()
        }
    }

    fn param(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        let by_reference = rhs.len() == 4;
        let ident = if by_reference { &rhs[1] } else { &rhs[0] };
        let type_attr = rhs.last().expect("Param always carries a TypeName");
        let ty = type_attr.ty;
        if let Some(id) = ident.symbol {
            let data_type = ty.to_data_type().unwrap_or(DataType::Void);
            let _ = lexer.symtab_mut().set_kind(id, SymbolKind::Parameter);
            let offset = {
                let frame = self.frames.last_mut().expect("parameter outside any subprogram header");
                let offset = frame.offset;
                frame.offset += data_type.size();
                offset
            };
            let entry = lexer.symtab_mut().get_mut(id);
            entry.data_type = data_type;
            entry.memory_offset = Some(offset);
        }
        let sig = ParamSig {
            name: ident.text.clone(),
            ty,
            by_reference,
            span: ident.span,
        };
        Attrs {
            params: vec![sig],
            ..Attrs::default()
        }
    }

    // ---- Statements ----

    fn stmt_list(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.is_empty() {
            return Attrs::default();
        }
        let prior = &rhs[0];
        let stmt = &rhs[1];
        Attrs {
            ret: earliest_ret(prior.ret, stmt.ret),
            exit_count: prior.exit_count + stmt.exit_count,
            exit_site: prior.exit_site.or(stmt.exit_site),
            ..Attrs::default()
        }
    }

    fn stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 3 {
            // begin StmtList end
            let body = &rhs[1];
            Attrs {
                ret: body.ret,
                exit_count: body.exit_count,
                exit_site: body.exit_site,
                ..Attrs::default()
            }
        } else {
            rhs[0].clone()
        }
    }

    fn assign_stmt(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // identifier := Expr
        let ident = &rhs[0];
        let expr = &rhs[2];
        if let Some(id) = ident.symbol {
            let entry = lexer.symtab_mut().get(id);
            match entry.kind {
                SymbolKind::Function | SymbolKind::Procedure | SymbolKind::Program => {
                    self.error(
                        ident.span,
                        format!("cannot assign to '{}': it names a {}", ident.text, kind_name(entry.kind)),
                    );
                }
                _ => {
                    let declared = TypeTag::from_data_type(entry.data_type);
                    if !expr.ty.is_error() && declared != expr.ty {
                        self.error(
                            expr.span,
                            format!("{} is not compatible with {}", declared.display(), expr.ty.display()),
                        );
                    }
                }
            }
        }
        Attrs::default()
    }

    fn call_check(&mut self, ident: &Attrs, args: &[TypeTag], lexer: &mut Lexer, as_expression: bool) -> TypeTag {
        let Some(id) = ident.symbol else {
            return TypeTag::TypeError;
        };
        let (kind, params, return_type) = {
            let entry = lexer.symtab_mut().get(id);
            (entry.kind, entry.parameters.clone(), entry.return_type)
        };
        if kind == SymbolKind::Program {
            self.error(ident.span, format!("'{}' is the main program and cannot be called", ident.text));
            return TypeTag::TypeError;
        }
        if kind == SymbolKind::Procedure && as_expression {
            self.error(
                ident.span,
                format!("'{}' is a procedure and cannot be used in an expression", ident.text),
            );
            return TypeTag::TypeError;
        }
        if !matches!(kind, SymbolKind::Procedure | SymbolKind::Function) {
            self.error(ident.span, format!("'{}' is not callable", ident.text));
            return TypeTag::TypeError;
        }
        if params.len() != args.len() {
            self.error(
                ident.span,
                format!("'{}' expects {} argument(s), found {}", ident.text, params.len(), args.len()),
            );
            return TypeTag::TypeError;
        }
        let mut ok = true;
        for (param, arg_ty) in params.iter().zip(args.iter()) {
            if arg_ty.is_error() {
                ok = false;
                continue;
            }
            let expected = TypeTag::from_data_type(param.data_type);
            if expected != *arg_ty {
                self.error(
                    ident.span,
                    format!(
                        "argument type mismatch for '{}': expected {}, found {}",
                        param.name,
                        expected.display(),
                        arg_ty.display()
                    ),
                );
                ok = false;
            }
        }
        if !ok {
            return TypeTag::TypeError;
        }
        if as_expression {
            match kind {
                SymbolKind::Function => TypeTag::from_data_type(return_type.unwrap_or(DataType::Void)),
                _ => TypeTag::TypeError,
            }
        } else {
            TypeTag::TypeOk
        }
    }

    fn call_stmt(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // identifier ( ArgList )
        let _ = self.call_check(&rhs[0], &rhs[2].list, lexer, false);
        Attrs::default()
    }

    fn arg_list_nonempty(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 3 {
            let mut list = rhs[0].list.clone();
            list.push(rhs[2].ty);
            let mut arg_idents = rhs[0].arg_idents.clone();
            arg_idents.push(rhs[2].as_ident.clone());
            Attrs {
                list,
                arg_idents,
                span: rhs[2].span,
                ..Attrs::default()
            }
        } else {
            Attrs {
                list: vec![rhs[0].ty],
                arg_idents: vec![rhs[0].as_ident.clone()],
                span: rhs[0].span,
                ..Attrs::default()
            }
        }
    }

    fn if_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        self.require_logical(&rhs[1], "if");
        if rhs.len() == 4 {
            // if Expr then Stmt
            let then_stmt = &rhs[3];
            Attrs {
                ret: then_stmt.ret,
                exit_count: then_stmt.exit_count,
                exit_site: then_stmt.exit_site,
                ..Attrs::default()
            }
        } else {
            // if Expr then Stmt else Stmt
            let then_stmt = &rhs[3];
            let else_stmt = &rhs[5];
            self.check_branch_returns(then_stmt.ret, else_stmt.ret);
            Attrs {
                ret: earliest_ret(then_stmt.ret, else_stmt.ret),
                exit_count: then_stmt.exit_count + else_stmt.exit_count,
                exit_site: then_stmt.exit_site.or(else_stmt.exit_site),
                ..Attrs::default()
            }
        }
    }

    fn while_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        self.require_logical(&rhs[1], "while");
        let body = &rhs[3];
        Attrs {
            ret: body.ret,
            exit_count: body.exit_count,
            exit_site: body.exit_site,
            ..Attrs::default()
        }
    }

    /// `repeat` also absorbs an `exit` used inside it (4.4(10): "escaped
    /// its enclosing loop or repeat"), but — unlike `loop` — it is not
    /// required to contain one.
    fn repeat_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        let body = &rhs[1];
        let cond = &rhs[3];
        self.require_logical(cond, "until");
        Attrs {
            ret: body.ret,
            ..Attrs::default()
        }
    }

    fn for_stmt(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        // for identifier := Expr to Expr do Stmt
        let ident = &rhs[1];
        let e1 = &rhs[3];
        let e2 = &rhs[5];
        let body = &rhs[7];
        if let Some(id) = ident.symbol {
            let ty = TypeTag::from_data_type(lexer.symtab_mut().get(id).data_type);
            if !ty.is_error() && ty != TypeTag::Integer {
                self.error(ident.span, format!("'for' loop variable must be integer, found {}", ty.display()));
            }
        }
        if !e1.ty.is_error() && e1.ty != TypeTag::Integer {
            self.error(e1.span, format!("'for' start expression must be integer, found {}", e1.ty.display()));
        }
        if !e2.ty.is_error() && e2.ty != TypeTag::Integer {
            self.error(e2.span, format!("'for' end expression must be integer, found {}", e2.ty.display()));
        }
        Attrs {
            ret: body.ret,
            exit_count: body.exit_count,
            exit_site: body.exit_site,
            ..Attrs::default()
        }
    }

    fn case_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        let expr = &rhs[1];
        if !expr.ty.is_error() && expr.ty != TypeTag::Integer {
            self.error(expr.span, format!("'case' selector must be integer, found {}", expr.ty.display()));
        }
        let arms = &rhs[3];
        if rhs.len() == 5 {
            Attrs {
                ret: arms.ret,
                exit_count: arms.exit_count,
                exit_site: arms.exit_site,
                ..Attrs::default()
            }
        } else {
            // case Expr of CaseArmList otherwise StmtList end
            let otherwise = &rhs[5];
            Attrs {
                ret: earliest_ret(arms.ret, otherwise.ret),
                exit_count: arms.exit_count + otherwise.exit_count,
                exit_site: arms.exit_site.or(otherwise.exit_site),
                ..Attrs::default()
            }
        }
    }

    fn case_arm_list(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 2 {
            let prior = &rhs[0];
            let arm = &rhs[1];
            Attrs {
                ret: earliest_ret(prior.ret, arm.ret),
                exit_count: prior.exit_count + arm.exit_count,
                exit_site: prior.exit_site.or(arm.exit_site),
                ..Attrs::default()
            }
        } else {
            rhs[0].clone()
        }
    }

    fn case_arm(&mut self, rhs: &[Attrs]) -> Attrs {
        // integer_literal : Stmt ;
        let stmt = &rhs[2];
        Attrs {
            ret: stmt.ret,
            exit_count: stmt.exit_count,
            exit_site: stmt.exit_site,
            ..Attrs::default()
        }
    }

    fn loop_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        let body = &rhs[1];
        // 4.4(8) reads "exactly one exit (count == 1)" but its own worked
        // example only exercises the zero-exit case and phrases the
        // diagnostic as "at least one"; a loop with two or more `exit`s is
        // accepted rather than flagged, matching that example.
        if body.exit_count == 0 {
            self.error(rhs[0].span, "Loop must contain at least one exit");
        }
        Attrs {
            ret: body.ret,
            ..Attrs::default()
        }
    }

    fn exit_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 3 {
            // exit when Expr
            self.require_logical(&rhs[2], "exit when");
        }
        Attrs {
            exit_count: 1,
            exit_site: Some(rhs[0].span),
            ..Attrs::default()
        }
    }

    fn return_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        let site = rhs[0].span;
        if rhs.len() == 2 {
            let expr = &rhs[1];
            match self.frames.last() {
                Some(frame) if frame.kind == FrameKind::Function => {
                    let declared = frame.return_type.map(TypeTag::from_data_type).unwrap_or(TypeTag::None);
                    if !expr.ty.is_error() && expr.ty != declared {
                        self.error(
                            expr.span,
                            format!("{} is not compatible with {}", declared.display(), expr.ty.display()),
                        );
                    }
                }
                _ => self.error(site, "'return' with a value is only legal inside a function"),
            }
            Attrs {
                ret: Some((expr.ty, site)),
                ..Attrs::default()
            }
        } else {
            if let Some(frame) = self.frames.last() {
                if frame.kind == FrameKind::Function {
                    self.error(site, "'return' with no expression is not legal inside a function");
                }
            }
            Attrs {
                ret: Some((TypeTag::None, site)),
                ..Attrs::default()
            }
        }
    }

    fn write_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        self.check_io_types(&rhs[2].list, rhs[2].span, "write");
        Attrs::default()
    }

    fn writeln_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        self.check_io_types(&rhs[2].list, rhs[2].span, "writeln");
        Attrs::default()
    }

    fn read_stmt(&mut self, rhs: &[Attrs]) -> Attrs {
        let args = &rhs[2];
        for (i, ty) in args.list.iter().enumerate() {
            match args.arg_idents.get(i).and_then(|a| a.as_ref()) {
                Some(ident) => {
                    if !ty.is_error() && !matches!(ty, TypeTag::Integer | TypeTag::Str) {
                        self.error(ident.span, format!("'read' argument must be integer or string, found {}", ty.display()));
                    }
                }
                None => self.error(args.span, "'read' arguments must be identifiers"),
            }
        }
        Attrs::default()
    }

    // ---- Expressions ----

    fn expr(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 1 {
            return rhs[0].clone();
        }
        let op = rhs[1].term.unwrap_or("or");
        let ty = self.binary_strict(op, &rhs[0], &rhs[2], TypeTag::Logical, TypeTag::Logical);
        Attrs {
            ty,
            ..Attrs::default()
        }
    }

    fn term1(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 1 {
            return rhs[0].clone();
        }
        let ty = self.binary_strict("and", &rhs[0], &rhs[2], TypeTag::Logical, TypeTag::Logical);
        Attrs {
            ty,
            ..Attrs::default()
        }
    }

    fn term2(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 1 {
            return rhs[0].clone();
        }
        if rhs[1].term == Some("in") {
            let ty = self.check_in(&rhs[0], &rhs[2]);
            Attrs {
                ty,
                ..Attrs::default()
            }
        } else {
            let op = rhs[1].term.unwrap_or("=");
            let ty = self.binary_strict(op, &rhs[0], &rhs[2], TypeTag::Integer, TypeTag::Logical);
            Attrs {
                ty,
                ..Attrs::default()
            }
        }
    }

    fn check_in(&mut self, left: &Attrs, list: &Attrs) -> TypeTag {
        let mut bad = false;
        if left.ty.is_error() {
            bad = true;
        } else if left.ty != TypeTag::Integer {
            self.error(left.span, format!("'in' expects an integer operand, found {}", left.ty.display()));
            bad = true;
        }
        for ty in &list.list {
            if ty.is_error() {
                bad = true;
            } else if *ty != TypeTag::Integer {
                self.error(list.span, format!("'in' list elements must be integer, found {}", ty.display()));
                bad = true;
            }
        }
        if bad {
            TypeTag::TypeError
        } else {
            TypeTag::Logical
        }
    }

    fn additive(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 1 {
            return rhs[0].clone();
        }
        let op = rhs[1].term.unwrap_or("+");
        let ty = if op == "+" {
            self.binary_plus(&rhs[0], &rhs[2])
        } else {
            self.binary_strict(op, &rhs[0], &rhs[2], TypeTag::Integer, TypeTag::Integer)
        };
        Attrs {
            ty,
            ..Attrs::default()
        }
    }

    fn binary_plus(&mut self, left: &Attrs, right: &Attrs) -> TypeTag {
        if left.ty.is_error() || right.ty.is_error() {
            return TypeTag::TypeError;
        }
        if left.ty == right.ty && matches!(left.ty, TypeTag::Integer | TypeTag::Str) {
            left.ty
        } else {
            self.error(
                right.span,
                format!("'+' expects matching integer or string operands, found {} and {}", left.ty.display(), right.ty.display()),
            );
            TypeTag::TypeError
        }
    }

    fn multiplicative(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 1 {
            return rhs[0].clone();
        }
        let op = rhs[1].term.unwrap_or("*");
        let ty = self.binary_strict(op, &rhs[0], &rhs[2], TypeTag::Integer, TypeTag::Integer);
        Attrs {
            ty,
            ..Attrs::default()
        }
    }

    fn power(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 1 {
            return rhs[0].clone();
        }
        let ty = self.binary_strict("**", &rhs[0], &rhs[2], TypeTag::Integer, TypeTag::Integer);
        Attrs {
            ty,
            ..Attrs::default()
        }
    }

    fn binary_strict(&mut self, op: &str, left: &Attrs, right: &Attrs, operand: TypeTag, result: TypeTag) -> TypeTag {
        let l_ok = left.ty.is_error() || left.ty == operand;
        let r_ok = right.ty.is_error() || right.ty == operand;
        if !l_ok {
            self.error(left.span, format!("'{op}' expects {} operands, found {}", operand.display(), left.ty.display()));
        }
        if !r_ok {
            self.error(right.span, format!("'{op}' expects {} operands, found {}", operand.display(), right.ty.display()));
        }
        if left.ty.is_error() || right.ty.is_error() || !l_ok || !r_ok {
            TypeTag::TypeError
        } else {
            result
        }
    }

    fn factor(&mut self, rhs: &[Attrs], lexer: &mut Lexer) -> Attrs {
        match rhs.len() {
            1 => match rhs[0].term {
                Some("identifier") => self.factor_identifier(&rhs[0], lexer),
                Some("integer_literal") => Attrs {
                    ty: TypeTag::Integer,
                    int_value: rhs[0].int_value,
                    ..Attrs::default()
                },
                Some("string_literal") => Attrs {
                    ty: TypeTag::Str,
                    text: rhs[0].text.clone(),
                    ..Attrs::default()
                },
                Some("true") | Some("false") => Attrs {
                    ty: TypeTag::Logical,
                    ..Attrs::default()
                },
                _ => Attrs::default(),
            },
            2 => {
                let op = rhs[0].term.unwrap_or("");
                let operand = &rhs[1];
                let ty = match op {
                    "-" | "+" => {
                        if operand.ty.is_error() {
                            TypeTag::TypeError
                        } else if operand.ty == TypeTag::Integer {
                            TypeTag::Integer
                        } else {
                            self.error(operand.span, format!("unary '{op}' expects an integer operand, found {}", operand.ty.display()));
                            TypeTag::TypeError
                        }
                    }
                    "not" => {
                        if operand.ty.is_error() {
                            TypeTag::TypeError
                        } else if operand.ty == TypeTag::Logical {
                            TypeTag::Logical
                        } else {
                            self.error(operand.span, format!("'not' expects a logical operand, found {}", operand.ty.display()));
                            TypeTag::TypeError
                        }
                    }
                    _ => TypeTag::TypeError,
                };
                Attrs {
                    ty,
                    ..Attrs::default()
                }
            }
            3 => rhs[1].clone(), // ( Expr )
            4 => match rhs[0].term {
                Some("identifier") => {
                    let ty = self.call_check(&rhs[0], &rhs[2].list, lexer, true);
                    Attrs {
                        ty,
                        ..Attrs::default()
                    }
                }
                Some(name @ ("max" | "min")) => {
                    let ty = self.check_max_min(name, &rhs[2]);
                    Attrs {
                        ty,
                        ..Attrs::default()
                    }
                }
                _ => Attrs::default(),
            },
            n => unreachable!("Factor arity {n}"),
        }
    }

    fn factor_identifier(&mut self, ident: &Attrs, lexer: &mut Lexer) -> Attrs {
        let Some(id) = ident.symbol else {
            return Attrs {
                ty: TypeTag::TypeError,
                ..Attrs::default()
            };
        };
        let (kind, data_type) = {
            let entry = lexer.symtab_mut().get(id);
            (entry.kind, entry.data_type)
        };
        match kind {
            SymbolKind::Variable | SymbolKind::Parameter => Attrs {
                ty: TypeTag::from_data_type(data_type),
                symbol: Some(id),
                as_ident: Some(IdentRef {
                    symbol: Some(id),
                    span: ident.span,
                    text: ident.text.clone(),
                }),
                ..Attrs::default()
            },
            SymbolKind::Function | SymbolKind::Procedure | SymbolKind::Program => {
                self.error(ident.span, format!("'{}' must be called with '(...)' to use its value", ident.text));
                Attrs {
                    ty: TypeTag::TypeError,
                    ..Attrs::default()
                }
            }
            SymbolKind::Unknown => Attrs {
                ty: TypeTag::TypeError,
                ..Attrs::default()
            },
        }
    }

    fn check_max_min(&mut self, name: &str, list: &Attrs) -> TypeTag {
        if list.list.is_empty() {
            self.error(list.span, format!("'{name}' requires at least one argument"));
            return TypeTag::TypeError;
        }
        let mut bad = false;
        for ty in &list.list {
            if ty.is_error() {
                bad = true;
            } else if *ty != TypeTag::Integer {
                self.error(list.span, format!("'{name}' arguments must be integer, found {}", ty.display()));
                bad = true;
            }
        }
        if bad {
            TypeTag::TypeError
        } else {
            TypeTag::Integer
        }
    }

    fn list_lit(&mut self, rhs: &[Attrs]) -> Attrs {
        Attrs {
            list: rhs[1].list.clone(),
            span: rhs[1].span,
            ..Attrs::default()
        }
    }

    fn expr_list(&mut self, rhs: &[Attrs]) -> Attrs {
        if rhs.len() == 3 {
            let mut list = rhs[0].list.clone();
            list.push(rhs[2].ty);
            Attrs {
                list,
                span: rhs[2].span,
                ..Attrs::default()
            }
        } else {
            Attrs {
                list: vec![rhs[0].ty],
                span: rhs[0].span,
                ..Attrs::default()
            }
        }
    }

    // ---- Small shared helpers ----

    fn require_logical(&mut self, attr: &Attrs, context: &str) {
        if !attr.ty.is_error() && attr.ty != TypeTag::Logical {
            self.error(attr.span, format!("'{context}' condition must be logical, found {}", attr.ty.display()));
        }
    }

    fn check_branch_returns(&mut self, then_ret: Option<(TypeTag, Span)>, else_ret: Option<(TypeTag, Span)>) {
        if let (Some((t1, _)), Some((t2, site2))) = (then_ret, else_ret) {
            if !t1.is_error() && !t2.is_error() && t1 != t2 {
                self.error(site2, format!("mismatched return types on the two branches: {} and {}", t1.display(), t2.display()));
            }
        }
    }

    fn check_io_types(&mut self, list: &[TypeTag], span: Span, stmt: &str) {
        for ty in list {
            if !ty.is_error() && !matches!(ty, TypeTag::Integer | TypeTag::Str) {
                self.error(span, format!("'{stmt}' arguments must be integer or string, found {}", ty.display()));
            }
        }
    }
}

fn earliest_ret(a: Option<(TypeTag, Span)>, b: Option<(TypeTag, Span)>) -> Option<(TypeTag, Span)> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a.1.start <= b.1.start { a } else { b }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn kind_name(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Variable => "variable",
        SymbolKind::Parameter => "parameter",
        SymbolKind::Function => "function",
        SymbolKind::Procedure => "procedure",
        SymbolKind::Program => "program",
        SymbolKind::Unknown => "identifier",
    }
}

fn passthrough_or_default(rhs: &[Attrs]) -> Attrs {
    if rhs.is_empty() {
        Attrs::default()
    } else {
        rhs[0].clone()
    }
}
