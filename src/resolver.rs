use crate::error;
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;
use std::collections::HashMap;
use std::rc::Rc;

/// What kind of function body the walk is currently inside. Drives the
/// 'return' checks.
#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

/// Same idea for class bodies; drives the 'this' and 'super' checks.
#[derive(Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// A single pass between the parser and the interpreter that walks the tree
/// once, binding every local variable reference to the lexical distance of
/// the scope that defines it and reporting the errors detectable without
/// running anything. There is no control flow here: both branches of an if
/// resolve, and a loop body resolves exactly once.
///
/// Only block scopes are tracked. Globals stay dynamic in Lox: a name found
/// in no tracked scope is left out of the table and looked up against the
/// globals frame at runtime.
pub struct Resolver {
    /// Stack of scopes, innermost last. Each maps a name to whether its
    /// initializer has finished resolving; false flags the window where
    /// `var a = a;` must be rejected.
    scopes: Vec<HashMap<String, bool>>,

    /// The side table: expression identity to scope distance.
    resolved: HashMap<ExprId, usize>,

    current_function: FunctionType,
    current_class: ClassType,
}

impl Resolver {
    pub fn new() -> Resolver {
        Self {
            scopes: Vec::new(),
            resolved: HashMap::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<ExprId, usize> {
        self.resolve_statements(statements);
        self.resolved
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Block { statements } => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::Var { name, initializer } => {
                // Binding is split into declaring and defining so that an
                // initializer mentioning the name being bound is caught in
                // between.
                self.declare(name);
                if let Some(expression) = initializer {
                    self.resolve_expression(expression);
                }
                self.define(name);
            }
            Stmt::Function { decl } => {
                // Declared and defined eagerly so the function can refer to
                // itself recursively inside its own body.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionType::Function);
            }
            Stmt::Expression { expression } | Stmt::Print { expression } => {
                self.resolve_expression(expression);
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expression(condition);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    error::token_error(keyword, "Can't return from top-level code.");
                }

                if let Some(expression) = value {
                    if self.current_function == FunctionType::Initializer {
                        error::token_error(keyword, "Can't return a value from an initializer.");
                    }
                    self.resolve_expression(expression);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expression(condition);
                self.resolve_statement(body);
            }
            Stmt::Class { name, superclass, methods } => {
                let enclosing_class = self.current_class;
                self.current_class = ClassType::Class;

                self.declare(name);
                self.define(name);

                if let Some(superclass) = superclass {
                    if let Expr::Variable { name: super_name, .. } = superclass {
                        if name.lexeme == super_name.lexeme {
                            error::token_error(super_name, "A class can't inherit from itself.");
                        }
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_expression(superclass);

                    // One extra scope holds 'super' for every method closure
                    // of a subclass.
                    self.begin_scope();
                    self.define_name("super");
                }

                self.begin_scope();
                self.define_name("this");

                for method in methods {
                    let declaration = match method.name.lexeme == "init" {
                        true => FunctionType::Initializer,
                        false => FunctionType::Method,
                    };
                    self.resolve_function(method, declaration);
                }

                self.end_scope();

                if superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }
    }

    fn resolve_expression(&mut self, expression: &Expr) {
        match expression {
            Expr::Variable { id, name } => {
                // Reading a variable inside its own initializer, e.g.
                // `var a = a;`, is a static error.
                if self.scopes.last().and_then(|scope| scope.get(&name.lexeme)) == Some(&false) {
                    error::token_error(name, "Can't read local variable in its own initializer.");
                }
                self.resolve_local(*id, name);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expression(value);
                self.resolve_local(*id, name);
            }
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            Expr::Call { callee, arguments, .. } => {
                self.resolve_expression(callee);
                for argument in arguments {
                    self.resolve_expression(argument);
                }
            }
            Expr::Grouping { expression } => {
                self.resolve_expression(expression);
            }
            Expr::Literal { .. } => {
                // No variables, no subexpressions: nothing to do.
            }
            Expr::Unary { right, .. } => {
                self.resolve_expression(right);
            }
            Expr::Get { object, .. } => {
                // Property names are looked up dynamically, so only the
                // object expression resolves.
                self.resolve_expression(object);
            }
            Expr::Set { object, value, .. } => {
                self.resolve_expression(value);
                self.resolve_expression(object);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    error::token_error(keyword, "Can't use 'this' outside of a class.");
                    return;
                }

                self.resolve_local(*id, keyword);
            }
            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        error::token_error(keyword, "Can't use 'super' outside of a class.");
                    }
                    ClassType::Class => {
                        error::token_error(keyword, "Can't use 'super' in a class with no superclass.");
                    }
                    ClassType::Subclass => {}
                }
                self.resolve_local(*id, keyword);
            }
            Expr::ListInitializer { items } => {
                for item in items {
                    self.resolve_expression(item);
                }
            }
        }
    }

    /// The walk into a function body happens right here, eagerly. That is
    /// the big difference from the interpreter, which doesn't touch a body
    /// until the function is called.
    fn resolve_function(&mut self, function: &Rc<FunctionDecl>, function_type: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = function_type;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Adds the name to the innermost scope, marked not-ready-yet, shadowing
    /// any outer binding. Declaring the same name twice in one local scope
    /// is an error; in the (untracked) global scope it is allowed.
    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                error::token_error(name, "Already a variable with this name in this scope.");
            }
            scope.insert(name.lexeme.clone(), false);
        }
    }

    /// Marks the name fully initialized and available for use.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Directly installs an injected name ('this', 'super') in the scope
    /// just pushed for it.
    fn define_name(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    /// Scans from the innermost scope outward; the first scope containing
    /// the name determines the distance recorded for this expression. Names
    /// found nowhere are assumed global and stay out of the table.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.resolved.insert(id, distance);
                return;
            }
        }
    }
}
