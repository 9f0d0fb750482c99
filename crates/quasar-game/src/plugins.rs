//! Plugin and file loaders
//!
//! Loaders are bytecode objects generated here rather than compiled from
//! source. Every plugin loader runs its items inside one catch region: a
//! failing item skips the remaining items of that plugin, prints a
//! diagnostic and lets the next plugin load.

use crate::interface::PluginContext;
use crate::plugin::{ItemType, Plugin, PluginManager};
use quasar_interpreter::arguments::check_string_arg;
use quasar_interpreter::opcode::{jump, BinaryOp, IndirectOp, Major, Scope, SpecialOp, StackOp};
use quasar_interpreter::{
    Arguments, BuiltinFunction, BytecodeBuilder, BytecodeRef, CompileError, Error, SubroutineValue, Value, World,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};

/// Services for resource and help files
pub trait ResourceHost {
    fn load_resource(&mut self, file_name: &str) -> Result<(), Error>;
    fn load_help_file(&mut self, file_name: &str) -> Result<(), Error>;
}

/// Resource host that accepts and discards everything
#[derive(Debug, Default)]
pub struct NullResourceHost;

impl ResourceHost for NullResourceHost {
    fn load_resource(&mut self, file_name: &str) -> Result<(), Error> {
        debug!(file = file_name, "resource file ignored");
        Ok(())
    }

    fn load_help_file(&mut self, file_name: &str) -> Result<(), Error> {
        debug!(file = file_name, "help file ignored");
        Ok(())
    }
}

fn special(bco: &mut BytecodeBuilder, op: SpecialOp) {
    bco.add_instruction(Major::Special, op as u8, 0);
}

/// `name(args...)` for a global function; the arguments are on the stack
fn call_global(bco: &mut BytecodeBuilder, name: &str, argc: u16, want_result: bool) -> Result<(), CompileError> {
    bco.add_named_instruction(Major::Push, Scope::NamedShared as u8, name)?;
    let op = if want_result { IndirectOp::Load } else { IndirectOp::Call };
    bco.add_instruction(Major::Indirect, op as u8, argc);
    Ok(())
}

/// `MakeFileName(Directory, name)`, leaving the path on the stack
fn push_item_path(bco: &mut BytecodeBuilder, name: &str) -> Result<(), CompileError> {
    bco.add_named_instruction(Major::Push, Scope::NamedVariable as u8, "DIRECTORY")?;
    bco.add_push_literal(Some(Value::from(name)))?;
    call_global(bco, "MAKEFILENAME", 2, true)
}

/// Print `prefix` followed by the error text on top of stack
fn print_error(bco: &mut BytecodeBuilder, prefix: String) -> Result<(), CompileError> {
    bco.add_push_literal(Some(Value::from(prefix)))?;
    bco.add_instruction(Major::Stack, StackOp::Swap as u8, 1);
    bco.add_instruction(Major::Binary, BinaryOp::Concat as u8, 0);
    special(bco, SpecialOp::Print);
    Ok(())
}

/// Compile the loader of one plugin
///
/// The loader enters the plugin's context so that `Directory` resolves to
/// the plugin directory when it runs, then executes the items in order.
pub fn create_plugin_loader(
    plugin: &Plugin,
    manager: &Rc<RefCell<PluginManager>>,
) -> Result<BytecodeRef, CompileError> {
    let mut bco = BytecodeBuilder::new();
    bco.set_subroutine_name(format!("Plugin {}", plugin.id()));
    bco.set_file_name(plugin.file_name.clone());
    bco.set_origin(plugin.id());

    let caught = bco.make_label()?;
    let end = bco.make_label()?;

    bco.add_push_literal(Some(PluginContext::new(plugin.id(), Rc::downgrade(manager)).into_value()))?;
    special(&mut bco, SpecialOp::With);
    bco.add_jump(jump::CATCH, caught);

    for item in &plugin.items {
        match item.item_type {
            ItemType::PlainFile => {}
            ItemType::ScriptFile => {
                push_item_path(&mut bco, &item.name)?;
                special(&mut bco, SpecialOp::Load);
            }
            ItemType::ResourceFile => {
                push_item_path(&mut bco, &item.name)?;
                call_global(&mut bco, "LOADRESOURCE", 1, false)?;
            }
            ItemType::HelpFile => {
                push_item_path(&mut bco, &item.name)?;
                call_global(&mut bco, "LOADHELPFILE", 1, false)?;
            }
            ItemType::Command => {
                bco.add_push_literal(Some(Value::from(item.name.as_str())))?;
                special(&mut bco, SpecialOp::EvalStatement);
            }
        }
    }
    special(&mut bco, SpecialOp::Uncatch);
    bco.add_jump(jump::ALWAYS, end);

    bco.add_label(caught);
    print_error(&mut bco, format!("Load of plugin \"{}\" failed: ", plugin.id()))?;

    bco.add_label(end);
    special(&mut bco, SpecialOp::EndWith);

    let bco = Rc::new(bco.relocate()?);
    debug!(plugin = plugin.id(), instructions = bco.num_instructions(), "plugin loader compiled");
    Ok(bco)
}

/// Compile a loader that runs the loaders of all plugins not loaded yet,
/// in dependency order.
///
/// Plugins are marked loaded when this loader is compiled, not when it runs;
/// a plugin whose loader fails is not retried by the next batch.
pub fn create_loader_for_unloaded_plugins(
    manager: &Rc<RefCell<PluginManager>>,
) -> Result<BytecodeRef, CompileError> {
    let ids: Vec<String> = manager
        .borrow()
        .enum_plugins_ordered()
        .into_iter()
        .filter(|p| !p.is_loaded())
        .map(|p| p.id().to_string())
        .collect();

    let mut bco = BytecodeBuilder::new();
    bco.set_subroutine_name("Load plugins");
    for id in &ids {
        let loader = {
            let plugins = manager.borrow();
            match plugins.find(id) {
                Some(plugin) => create_plugin_loader(plugin, manager)?,
                None => continue,
            }
        };
        bco.add_push_literal(Some(SubroutineValue::new(loader).into_value()))?;
        bco.add_instruction(Major::Indirect, IndirectOp::Call as u8, 0);
        if let Some(plugin) = manager.borrow_mut().find_mut(id) {
            plugin.set_loaded(true);
        }
    }
    info!(plugins = ids.len(), "plugin batch loader compiled");
    Ok(Rc::new(bco.relocate()?))
}

/// Compile a loader for one script file
///
/// A failing load prints a diagnostic unless `optional` is set; it is never
/// propagated to the caller.
pub fn create_file_loader(file_name: &str, origin: &str, optional: bool) -> Result<BytecodeRef, CompileError> {
    let mut bco = BytecodeBuilder::new();
    bco.set_subroutine_name(format!("Load {}", file_name));
    bco.set_origin(origin);

    let caught = bco.make_label()?;
    let end = bco.make_label()?;

    bco.add_jump(jump::CATCH, caught);
    bco.add_push_literal(Some(Value::from(file_name)))?;
    special(&mut bco, SpecialOp::Load);
    special(&mut bco, SpecialOp::Uncatch);
    bco.add_jump(jump::ALWAYS, end);

    bco.add_label(caught);
    if optional {
        bco.add_instruction(Major::Stack, StackOp::Drop as u8, 1);
    } else {
        print_error(&mut bco, format!("Error loading file \"{}\": ", file_name))?;
    }
    bco.add_label(end);

    Ok(Rc::new(bco.relocate()?))
}

/// `MakeFileName(part...)`: join path components; null if any is null
pub fn make_file_name(args: &mut Arguments) -> Result<Option<Value>, Error> {
    args.check_argument_count_range(1, usize::MAX)?;
    let mut path = PathBuf::new();
    while args.remaining() > 0 {
        match check_string_arg(args.next().as_ref())? {
            Some(part) => path.push(part),
            None => return Ok(None),
        }
    }
    Ok(Some(Value::from(path.to_string_lossy().into_owned())))
}

/// Define `MAKEFILENAME`, `LOADRESOURCE` and `LOADHELPFILE`
pub fn register_plugin_builtins(world: &mut World, resources: Rc<RefCell<dyn ResourceHost>>) {
    world.set_global(
        "MAKEFILENAME",
        Some(BuiltinFunction::function("MAKEFILENAME", |_, _, args| make_file_name(args)).into_value()),
    );

    let host = resources.clone();
    world.set_global(
        "LOADRESOURCE",
        Some(
            BuiltinFunction::procedure("LOADRESOURCE", move |_, _, args| {
                args.check_argument_count(1)?;
                if let Some(name) = check_string_arg(args.next().as_ref())? {
                    host.borrow_mut().load_resource(&name)?;
                }
                Ok(None)
            })
            .into_value(),
        ),
    );

    world.set_global(
        "LOADHELPFILE",
        Some(
            BuiltinFunction::procedure("LOADHELPFILE", move |_, _, args| {
                args.check_argument_count(1)?;
                if let Some(name) = check_string_arg(args.next().as_ref())? {
                    resources.borrow_mut().load_help_file(&name)?;
                }
                Ok(None)
            })
            .into_value(),
        ),
    );
}
