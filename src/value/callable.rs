use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::object::Object;

/// The capability shared by everything that can sit to the left of a call's
/// parentheses: user functions, bound methods, natives, and classes acting
/// as constructors. Arity is checked by the caller before `call` runs.
pub trait Callable {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, Error>;
}
