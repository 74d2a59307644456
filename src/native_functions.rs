use crate::environment::{Environment, MutableEnvironment};
use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::callable::Callable;
use crate::value::class::Class;
use crate::value::function::{Function, NativeFn};
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name the built-in list class is registered under; the interpreter looks
/// it up when evaluating a list literal.
pub const LIST_CLASS: &str = "List";
const LIST_ITERATOR_CLASS: &str = "ListIterator";

/// Key of the instance metafield holding a list's backing vector.
pub const ITEMS: &str = "items";

/// Builds the globals frame every interpreter starts from: the free
/// functions first, then the List and ListIterator classes.
pub fn standard_library() -> MutableEnvironment {
    let globals = Environment::new();

    let functions: &[(&'static str, usize, NativeFn)] = &[
        ("clock", 0, clock),
        ("input", 0, input),
        ("str", 1, to_str),
        ("float", 1, to_float),
        ("floor", 1, floor),
        ("ceil", 1, ceil),
        ("sin", 1, sin),
        ("cos", 1, cos),
        ("exp", 1, exp),
        ("log", 1, log),
    ];

    {
        let mut frame = globals.borrow_mut();
        for &(name, arity, function) in functions {
            frame.define(
                name.to_string(),
                Object::Function(Function::native(name, arity, function)),
            );
        }
        frame.define(LIST_CLASS.to_string(), Object::Class(list_class()));
        frame.define(LIST_ITERATOR_CLASS.to_string(), Object::Class(list_iterator_class()));
    }

    globals
}

/// Arity is checked before any native runs, so arguments can be taken
/// positionally; the fallback only keeps this total.
fn single(args: Vec<Object>) -> Object {
    args.into_iter().next().unwrap_or(Object::Nil)
}

fn number_arg(name: &str, args: Vec<Object>) -> Result<f64, Error> {
    match single(args) {
        Object::Number(n) => Ok(n),
        _ => Err(Error::Builtin(format!(
            "Built-in function '{name}' expects arguments of type float."
        ))),
    }
}

fn clock(_: &mut Interpreter, _: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::Builtin("System clock is before the epoch.".to_string()))?
        .as_secs_f64();
    Ok(Object::Number(seconds))
}

fn input(_: &mut Interpreter, _: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|error| Error::Builtin(format!("Could not read from stdin: {error}.")))?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Object::String(line))
}

fn to_str(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    match single(args) {
        Object::String(s) => Ok(Object::String(s)),
        // Reuses print's stringification, so str(7) is "7", not "7.0".
        number @ Object::Number(_) => Ok(Object::String(number.to_string())),
        _ => Err(Error::Builtin(
            "Built-in function 'str' expects arguments of type string or float.".to_string(),
        )),
    }
}

fn to_float(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    match single(args) {
        Object::Number(n) => Ok(Object::Number(n)),
        Object::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => Ok(Object::Number(n)),
            Err(_) => Err(Error::Builtin(
                "Built-in function 'float' could not convert string to number.".to_string(),
            )),
        },
        _ => Err(Error::Builtin(
            "Built-in function 'float' expects arguments of type string or float.".to_string(),
        )),
    }
}

fn floor(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    Ok(Object::Number(number_arg("floor", args)?.floor()))
}

fn ceil(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    Ok(Object::Number(number_arg("ceil", args)?.ceil()))
}

fn sin(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    Ok(Object::Number(number_arg("sin", args)?.sin()))
}

fn cos(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    Ok(Object::Number(number_arg("cos", args)?.cos()))
}

fn exp(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    Ok(Object::Number(number_arg("exp", args)?.exp()))
}

fn log(_: &mut Interpreter, _: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    Ok(Object::Number(number_arg("log", args)?.ln()))
}

/// The built-in List class. Its methods are natives that keep the storage in
/// an instance metafield, out of reach of user-visible fields.
fn list_class() -> Rc<Class> {
    let methods = HashMap::from([
        ("init".to_string(), Function::native("init", 0, list_init)),
        ("append".to_string(), Function::native("append", 1, list_append)),
        ("at".to_string(), Function::native("at", 1, list_at)),
        ("size".to_string(), Function::native("size", 0, list_size)),
        ("iterate".to_string(), Function::native("iterate", 0, list_iterate)),
    ]);
    Class::new(LIST_CLASS.to_string(), None, methods)
}

/// Companion iterator class; iterate() on a list builds one of these. The
/// list handle and cursor live in ordinary fields, only the list's storage
/// is host-side.
fn list_iterator_class() -> Rc<Class> {
    let methods = HashMap::from([
        ("init".to_string(), Function::native("init", 1, iterator_init)),
        ("hasItems".to_string(), Function::native("hasItems", 0, iterator_has_items)),
        ("get".to_string(), Function::native("get", 0, iterator_get)),
        ("move".to_string(), Function::native("move", 0, iterator_move)),
    ]);
    Class::new(LIST_ITERATOR_CLASS.to_string(), None, methods)
}

/// The receiver of a bound native method, defined by bind() at the
/// innermost frame of the method's closure.
fn receiver(closure: &MutableEnvironment) -> Result<Rc<RefCell<Instance>>, Error> {
    match Environment::get_at(closure, 0, "this") {
        Object::Instance(instance) => Ok(instance),
        _ => Err(Error::Builtin("Method called without a receiver.".to_string())),
    }
}

fn items_of(instance: &Rc<RefCell<Instance>>) -> Result<Rc<RefCell<Vec<Object>>>, Error> {
    instance
        .borrow()
        .metafields
        .get(ITEMS)
        .cloned()
        .ok_or_else(|| Error::Builtin("List storage is missing.".to_string()))
}

fn list_init(_: &mut Interpreter, closure: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    instance
        .borrow_mut()
        .metafields
        .insert(ITEMS.to_string(), Rc::new(RefCell::new(Vec::new())));
    Ok(Object::Nil)
}

fn list_append(_: &mut Interpreter, closure: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let items = items_of(&instance)?;
    items.borrow_mut().push(single(args));
    Ok(Object::Nil)
}

fn list_at(_: &mut Interpreter, closure: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let items = items_of(&instance)?;
    let items = items.borrow();
    let index = index_into(&items, single(args))?;
    Ok(items[index].clone())
}

fn list_size(_: &mut Interpreter, closure: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let items = items_of(&instance)?;
    let size = items.borrow().len();
    Ok(Object::Number(size as f64))
}

fn list_iterate(
    interpreter: &mut Interpreter,
    closure: &MutableEnvironment,
    _: Vec<Object>,
) -> Result<Object, Error> {
    let instance = receiver(closure)?;

    let lookup = interpreter.globals.borrow().get_by_name(LIST_ITERATOR_CLASS);
    let iterator_class = match lookup {
        Some(Object::Class(class)) => class,
        _ => return Err(Error::Builtin("ListIterator class is missing.".to_string())),
    };

    iterator_class.call(interpreter, vec![Object::Instance(instance)])
}

/// Fractional indices truncate; anything negative, past the end, or not a
/// number at all is rejected.
fn index_into(items: &[Object], index: Object) -> Result<usize, Error> {
    match index {
        Object::Number(n) if n >= 0.0 && (n as usize) < items.len() => Ok(n as usize),
        Object::Number(_) => Err(Error::Builtin("List index out of range.".to_string())),
        _ => Err(Error::Builtin("List index must be a number.".to_string())),
    }
}

fn iterator_init(_: &mut Interpreter, closure: &MutableEnvironment, args: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let mut frame = instance.borrow_mut();
    frame.set("list", single(args));
    frame.set("index", Object::Number(0.0));
    Ok(Object::Nil)
}

/// The storage of the list this iterator was built over.
fn iterated_items(instance: &Rc<RefCell<Instance>>) -> Result<Rc<RefCell<Vec<Object>>>, Error> {
    match instance.borrow().field("list") {
        Some(Object::Instance(list)) => items_of(&list),
        _ => Err(Error::Builtin("Iterator is not attached to a list.".to_string())),
    }
}

fn cursor(instance: &Rc<RefCell<Instance>>) -> f64 {
    match instance.borrow().field("index") {
        Some(Object::Number(n)) => n,
        _ => 0.0,
    }
}

fn iterator_has_items(_: &mut Interpreter, closure: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let items = iterated_items(&instance)?;
    let size = items.borrow().len();
    Ok(Object::Boolean(cursor(&instance) < size as f64))
}

fn iterator_get(_: &mut Interpreter, closure: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let items = iterated_items(&instance)?;
    let items = items.borrow();
    let index = index_into(&items, Object::Number(cursor(&instance)))?;
    Ok(items[index].clone())
}

fn iterator_move(_: &mut Interpreter, closure: &MutableEnvironment, _: Vec<Object>) -> Result<Object, Error> {
    let instance = receiver(closure)?;
    let next = cursor(&instance) + 1.0;
    instance.borrow_mut().set("index", Object::Number(next));
    Ok(Object::Nil)
}
