use crate::environment::{Environment, MutableEnvironment};
use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::stmt::FunctionDecl;
use crate::value::callable::Callable;
use crate::value::object::Object;
use std::rc::Rc;

/// Host-provided behavior behind a callable. Receives the interpreter, the
/// function's closure (where a bound 'this' lives, if any) and the already
/// evaluated arguments.
pub type NativeFn =
    fn(&mut Interpreter, &MutableEnvironment, Vec<Object>) -> Result<Object, Error>;

/// The runtime representation of a function: either a declaration paired
/// with the environment it closed over, or a host function of fixed arity.
#[derive(Clone, Debug)]
pub enum Function {
    Native {
        name: &'static str,
        arity: usize,
        function: NativeFn,
        closure: MutableEnvironment,
    },
    UserDefined {
        /// Whether this function is a class's 'init'. Set by comparing the
        /// method name at class-declaration time; a freestanding function
        /// that happens to be called init is not an initializer.
        is_initializer: bool,

        declaration: Rc<FunctionDecl>,

        /// The environment that was active when the function was declared,
        /// not when it is called: the lexical scope surrounding the
        /// declaration.
        closure: MutableEnvironment,
    },
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: MutableEnvironment, is_initializer: bool) -> Self {
        Function::UserDefined { is_initializer, declaration, closure }
    }

    pub fn native(name: &'static str, arity: usize, function: NativeFn) -> Self {
        Function::Native { name, arity, function, closure: Environment::new() }
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Native { name, .. } => name,
            Function::UserDefined { declaration, .. } => &declaration.name.lexeme,
        }
    }

    /// Method binding is a closure extension: a fresh frame defining 'this'
    /// wraps the original closure and the returned function carries the
    /// extended chain. There is no separate bound-method type at runtime.
    /// Natives bind the same way so built-in classes can find their
    /// receiver.
    pub fn bind(&self, instance: &Object) -> Function {
        match self {
            Function::UserDefined { is_initializer, declaration, closure } => {
                let scope = Environment::new_enclosing(closure);
                scope.borrow_mut().define("this".to_string(), instance.clone());
                Function::new(Rc::clone(declaration), scope, *is_initializer)
            }
            Function::Native { name, arity, function, closure } => {
                let scope = Environment::new_enclosing(closure);
                scope.borrow_mut().define("this".to_string(), instance.clone());
                Function::Native { name: *name, arity: *arity, function: *function, closure: scope }
            }
        }
    }

    /// Identity comparison backing `==`: a function equals itself and its
    /// clones, never a structurally similar function or another binding of
    /// the same declaration.
    pub fn is_same(&self, other: &Function) -> bool {
        match (self, other) {
            (
                Function::UserDefined { declaration: l_decl, closure: l_env, .. },
                Function::UserDefined { declaration: r_decl, closure: r_env, .. },
            ) => Rc::ptr_eq(l_decl, r_decl) && Rc::ptr_eq(l_env, r_env),
            (
                Function::Native { function: l_fn, closure: l_env, .. },
                Function::Native { function: r_fn, closure: r_env, .. },
            ) => l_fn == r_fn && Rc::ptr_eq(l_env, r_env),
            _ => false,
        }
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        match self {
            Function::Native { arity, .. } => *arity,
            Function::UserDefined { declaration, .. } => declaration.params.len(),
        }
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, Error> {
        match self {
            Function::Native { function, closure, .. } => function(interpreter, closure, args),
            Function::UserDefined { is_initializer, declaration, closure } => {
                // Each call gets a fresh environment chained onto the
                // closure, holding the parameters. The body executes there,
                // not in the caller's environment.
                let scope = Environment::new_enclosing(closure);
                for (param, arg) in declaration.params.iter().zip(args) {
                    scope.borrow_mut().define(param.lexeme.clone(), arg);
                }

                match interpreter.execute_block(&declaration.body, scope) {
                    // A 'return' anywhere in the body unwinds to exactly
                    // this call boundary.
                    Err(Error::Return(value)) => match is_initializer {
                        // An initializer hands back its instance no matter
                        // what; the resolver has already rejected returns
                        // with a value inside init.
                        true => Ok(Environment::get_at(closure, 0, "this")),
                        false => Ok(value),
                    },
                    Err(error) => Err(error),
                    Ok(()) => match is_initializer {
                        true => Ok(Environment::get_at(closure, 0, "this")),
                        // Falling off the end of a function yields nil.
                        false => Ok(Object::Nil),
                    },
                }
            }
        }
    }
}
