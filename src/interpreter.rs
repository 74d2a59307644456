use crate::environment::{Environment, MutableEnvironment};
use crate::error;
use crate::error::Error;
use crate::expr::{Expr, ExprId};
use crate::native_functions;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;
use crate::token::TokenType::*;
use crate::value::class::Class;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The interpreter does a post-order traversal of the AST: each node
/// evaluates its children before doing its own work. The two node kinds are
/// handled by separate methods: statements run in `execute` for their
/// effects, expressions reduce to a value in `evaluate`.
pub struct Interpreter {
    /// Fixed handle on the outermost frame, which holds the standard
    /// library and every top-level definition.
    pub globals: MutableEnvironment,

    /// The frame of the code currently executing; moves as blocks and calls
    /// are entered and left, always restored on the way out.
    environment: MutableEnvironment,

    /// The resolver's side table. Expressions absent from it are globals.
    locals: HashMap<ExprId, usize>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        let globals = native_functions::standard_library();
        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
        }
    }

    /// Merges one resolver run's output into the side table. The REPL
    /// resolves every line separately and extends this same table, so
    /// closures from earlier lines keep resolving.
    pub fn add_locals(&mut self, locals: HashMap<ExprId, usize>) {
        self.locals.extend(locals);
    }

    /// Runs a program. A runtime error aborts the remaining statements and
    /// is reported, but global state stays intact: the next interpret()
    /// picks up where this one left off.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                error::runtime_error(error);
                break;
            }
        }
    }

    /// The statement analogue of evaluate(). Statements produce no value,
    /// so success carries nothing.
    fn execute(&mut self, statement: &Stmt) -> Result<(), Error> {
        match statement {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
                Ok(())
            }
            Stmt::Print { expression } => {
                let value = self.evaluate(expression)?;
                println!("{value}");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let mut value = Object::Nil;
                if let Some(expression) = initializer {
                    value = self.evaluate(expression)?;
                }
                self.environment.borrow_mut().define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block { statements } => {
                self.execute_block(statements, Environment::new_enclosing(&self.environment))
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function { decl } => {
                // The compile-time representation of the function becomes
                // its runtime representation, closing over the environment
                // active right now: the one surrounding the declaration.
                let function =
                    Function::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme.clone(), Object::Function(function));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let mut return_value = Object::Nil;
                if let Some(expression) = value {
                    return_value = self.evaluate(expression)?;
                }

                // A return can sit arbitrarily deep in nested statements.
                // It unwinds as a dedicated variant, caught at the function
                // call boundary and nowhere else.
                Err(Error::Return(return_value))
            }
            Stmt::Class { name, superclass, methods } => {
                self.execute_class(name, superclass.as_ref(), methods)
            }
        }
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<(), Error> {
        // The superclass expression evaluates first; inheriting from
        // anything but a class is a runtime error at the superclass name.
        let mut superclass_value = None;
        if let Some(superclass_expr) = superclass {
            match self.evaluate(superclass_expr)? {
                Object::Class(class) => superclass_value = Some(class),
                _ => {
                    let token = match superclass_expr {
                        Expr::Variable { name, .. } => name.clone(),
                        _ => name.clone(),
                    };
                    return Err(Error::Runtime {
                        token,
                        message: "Superclass must be a class.".to_string(),
                    });
                }
            }
        }

        // The name is declared before the body is processed so methods can
        // refer to the class itself.
        self.environment
            .borrow_mut()
            .define(name.lexeme.clone(), Object::Nil);

        // Methods of a subclass close over one extra frame holding 'super';
        // 'this' is bound one frame further in, at method bind time.
        let previous = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass_value {
            let scope = Environment::new_enclosing(&self.environment);
            scope
                .borrow_mut()
                .define("super".to_string(), Object::Class(Rc::clone(superclass)));
            self.environment = scope;
        }

        let mut class_methods = HashMap::new();
        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function =
                Function::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            class_methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Class::new(name.lexeme.clone(), superclass_value, class_methods);

        self.environment = previous;
        self.environment
            .borrow_mut()
            .assign(name, Object::Class(class))?;
        Ok(())
    }

    /// Runs statements in the given environment and restores the previous
    /// one on every exit path: normal completion, a runtime error, or a
    /// 'return' unwinding through.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: MutableEnvironment,
    ) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    /// Reduces an Expr tree to a value. For each kind of expression there is
    /// a corresponding chunk of code that knows how to evaluate it.
    pub fn evaluate(&mut self, expression: &Expr) -> Result<Object, Error> {
        match expression {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match (&operator.token_type, value) {
                    (MINUS, Object::Number(n)) => Ok(Object::Number(-n)),
                    (BANG, value) => Ok(Object::Boolean(!value.is_truthy())),
                    _ => Err(Error::Runtime {
                        token: operator.clone(),
                        message: "Operand must be a number.".to_string(),
                    }),
                }
            }
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match (&operator.token_type, left, right) {
                    (STAR, Object::Number(l), Object::Number(r)) => Ok(Object::Number(l * r)),
                    // Division follows IEEE-754: dividing by zero yields an
                    // infinity or NaN, never an error.
                    (SLASH, Object::Number(l), Object::Number(r)) => Ok(Object::Number(l / r)),
                    (MINUS, Object::Number(l), Object::Number(r)) => Ok(Object::Number(l - r)),

                    // '+' is overloaded: numeric addition or string
                    // concatenation, nothing in between.
                    (PLUS, Object::Number(l), Object::Number(r)) => Ok(Object::Number(l + r)),
                    (PLUS, Object::String(l), Object::String(r)) => {
                        Ok(Object::String(l + r.as_str()))
                    }
                    (PLUS, _, _) => Err(Error::Runtime {
                        token: operator.clone(),
                        message: "Operands must be two numbers or two strings.".to_string(),
                    }),

                    (GREATER, Object::Number(l), Object::Number(r)) => Ok(Object::Boolean(l > r)),
                    (GREATER_EQUAL, Object::Number(l), Object::Number(r)) => {
                        Ok(Object::Boolean(l >= r))
                    }
                    (LESS, Object::Number(l), Object::Number(r)) => Ok(Object::Boolean(l < r)),
                    (LESS_EQUAL, Object::Number(l), Object::Number(r)) => {
                        Ok(Object::Boolean(l <= r))
                    }

                    (BANG_EQUAL, l, r) => Ok(Object::Boolean(!l.is_equal(&r))),
                    (EQUAL_EQUAL, l, r) => Ok(Object::Boolean(l.is_equal(&r))),

                    _ => Err(Error::Runtime {
                        token: operator.clone(),
                        message: "Operands must be numbers.".to_string(),
                    }),
                }
            }
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                // A logical operator returns an operand with the right
                // truthiness, not a bare boolean: `"hi" or 2` is "hi". The
                // right side only evaluates when the left doesn't decide.
                if operator.token_type == OR {
                    if left.is_truthy() {
                        return Ok(left);
                    }
                } else if !left.is_truthy() {
                    return Ok(left);
                }

                self.evaluate(right)
            }
            Expr::Variable { id, name } => self.look_up_variable(name, *id),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(distance) => {
                        Environment::assign_at(&self.environment, *distance, name, value.clone());
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                // Assignment is an expression, so it produces the assigned
                // value for any enclosing expression.
                Ok(value)
            }
            Expr::Call { callee, paren, arguments } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::new();
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                callee.call(self, args, paren)
            }
            Expr::Get { object, name } => match self.evaluate(object)? {
                Object::Instance(instance) => Instance::get(&instance, name),
                _ => Err(Error::Runtime {
                    token: name.clone(),
                    message: "Only instances have properties.".to_string(),
                }),
            },
            Expr::Set { object, name, value } => {
                let object = self.evaluate(object)?;

                let Object::Instance(instance) = object else {
                    return Err(Error::Runtime {
                        token: name.clone(),
                        message: "Only instances have fields.".to_string(),
                    });
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(&name.lexeme, value.clone());
                Ok(value)
            }
            Expr::This { id, keyword } => self.look_up_variable(keyword, *id),
            Expr::Super { id, method, .. } => {
                // 'super' lives in the frame the class declaration pushed
                // for it; 'this' sits exactly one frame further in, where
                // method binding put it.
                let distance = self
                    .locals
                    .get(id)
                    .copied()
                    .expect("the resolver records every 'super' expression");
                let object = Environment::get_at(&self.environment, distance - 1, "this");

                let found = match Environment::get_at(&self.environment, distance, "super") {
                    Object::Class(superclass) => superclass.find_method(&method.lexeme),
                    _ => None,
                };

                match found {
                    Some(function) => Ok(Object::Function(function.bind(&object))),
                    None => Err(Error::Runtime {
                        token: method.clone(),
                        message: format!("Undefined property '{}'.", method.lexeme),
                    }),
                }
            }
            Expr::ListInitializer { items } => {
                let mut values = Vec::new();
                for item in items {
                    values.push(self.evaluate(item)?);
                }

                // The literal becomes an instance of the built-in List class
                // with its backing vector installed directly; init() is not
                // involved.
                let lookup = self.globals.borrow().get_by_name(native_functions::LIST_CLASS);
                let class = match lookup {
                    Some(Object::Class(class)) => class,
                    _ => unreachable!("the List class is registered before user code runs"),
                };

                let mut instance = Instance::new(class);
                instance
                    .metafields
                    .insert(native_functions::ITEMS.to_string(), Rc::new(RefCell::new(values)));
                Ok(Object::Instance(Rc::new(RefCell::new(instance))))
            }
        }
    }

    /// The heart of resolved variable access: expressions in the side table
    /// read straight from the recorded frame, everything else is a dynamic
    /// lookup in the globals.
    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Object, Error> {
        match self.locals.get(&id) {
            Some(distance) => Ok(Environment::get_at(&self.environment, *distance, &name.lexeme)),
            None => self.globals.borrow().get(name),
        }
    }
}
