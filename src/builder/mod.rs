pub use self::{
    buffer::{BinaryHashKey, BufferAccumulator},
    convert::{Convert, ConverterCache},
    document::{Document, ImageFile, OutputFormat},
    messages::{Message, MessageLog, Severity},
    table::{Index, IndexedTable},
    tasks::{TaskPriority, TaskQueue},
};

pub mod buffer;
pub mod convert;
pub mod document;
pub mod messages;
pub mod table;
pub mod tasks;
