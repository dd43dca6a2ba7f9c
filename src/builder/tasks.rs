use crate::builder::document::Document;

/// Completion order for deferred work. Lower runs first: animation
/// completion can create nodes and skins the mesh pass reads, material
/// baking can depend on resolved mesh data, and textures are instantiated
/// just-in-time by the passes before them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TaskPriority {
    Animation,
    Mesh,
    Material,
    Texture,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Animation,
        TaskPriority::Mesh,
        TaskPriority::Material,
        TaskPriority::Texture,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Animation => "animation",
            TaskPriority::Mesh => "mesh",
            TaskPriority::Material => "material",
            TaskPriority::Texture => "texture",
        }
    }
}

type TaskFn = Box<dyn FnOnce(&mut Document, &mut TaskQueue)>;

struct Task {
    priority: TaskPriority,
    name: String,
    run: TaskFn,
}

/// Deferred-completion list for expensive conversions.
///
/// Indices are allocated eagerly during scene traversal so other entities
/// can reference not-yet-populated records; the closures enqueued here fill
/// those reserved records in later, in priority order. A task must only
/// write into the slot reserved for it at enqueue time, never create new
/// top-level entries that other already-issued indices could alias.
#[derive(Default)]
pub struct TaskQueue {
    pending: Vec<Task>,
    draining: Option<TaskPriority>,
}

impl TaskQueue {
    /// Queues `task` for [`run_all`](Self::run_all). Returns false (and
    /// drops the task) if called during a drain with a priority below the
    /// level currently executing, which could no longer be honored.
    pub fn enqueue(
        &mut self,
        priority: TaskPriority,
        name: impl Into<String>,
        task: impl FnOnce(&mut Document, &mut TaskQueue) + 'static,
    ) -> bool {
        if let Some(draining) = self.draining {
            if priority < draining {
                log::error!(
                    "rejected {} task enqueued while the {} level is draining",
                    priority.label(),
                    draining.label()
                );
                return false;
            }
        }

        self.pending.push(Task {
            priority,
            name: name.into(),
            run: Box::new(task),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Executes every pending task, one priority level at a time.
    ///
    /// Within a level, tasks run in enqueue order; tasks enqueued at the
    /// current level while it drains are picked up by another sweep of the
    /// same level before moving on, so a level is only left once it spawns
    /// no further work.
    pub fn run_all(&mut self, document: &mut Document) {
        for priority in TaskPriority::ALL {
            self.draining = Some(priority);

            loop {
                let mut batch = Vec::new();
                let mut rest = Vec::new();
                for task in self.pending.drain(..) {
                    if task.priority == priority {
                        batch.push(task);
                    } else {
                        rest.push(task);
                    }
                }
                self.pending = rest;

                if batch.is_empty() {
                    break;
                }

                for task in batch {
                    log::debug!("completing {} task: {}", priority.label(), task.name);
                    (task.run)(document, self);
                }
            }
        }

        self.draining = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::document::OutputFormat;

    #[test]
    fn tasks_run_in_priority_order() {
        let mut doc = Document::new(OutputFormat::Glb);
        let mut queue = TaskQueue::default();

        // Enqueued out of order on purpose.
        queue.enqueue(TaskPriority::Texture, "encode", |doc, _| {
            doc.add_buffer_view(&[2; 10], None, 1);
        });
        queue.enqueue(TaskPriority::Material, "bake", |doc, _| {
            doc.add_buffer_view(&[1; 3], None, 1);
        });

        queue.run_all(&mut doc);

        // Material's 3 bytes first, then Texture's 10.
        let mut expected = vec![1u8; 3];
        expected.extend_from_slice(&[2; 10]);
        assert_eq!(expected, doc.buffer_data());
        assert!(queue.is_empty());
    }

    #[test]
    fn spawned_tasks_run_before_later_levels() {
        let mut doc = Document::new(OutputFormat::Glb);
        let mut queue = TaskQueue::default();

        queue.enqueue(TaskPriority::Texture, "encode", |doc, _| {
            doc.add_buffer_view(&[3], None, 1);
        });
        queue.enqueue(TaskPriority::Material, "bake", |doc, queue| {
            doc.add_buffer_view(&[1], None, 1);
            // A bake discovering it needs another material pass.
            queue.enqueue(TaskPriority::Material, "bake dependent", |doc, _| {
                doc.add_buffer_view(&[2], None, 1);
            });
        });

        queue.run_all(&mut doc);

        assert_eq!(&[1, 2, 3], doc.buffer_data());
    }

    #[test]
    fn enqueue_below_draining_level_is_rejected() {
        let mut doc = Document::new(OutputFormat::Glb);
        let mut queue = TaskQueue::default();

        queue.enqueue(TaskPriority::Material, "bake", |_doc, queue| {
            assert!(!queue.enqueue(TaskPriority::Mesh, "late", |_, _| {}));
            assert!(queue.enqueue(TaskPriority::Texture, "fine", |doc, _| {
                doc.add_buffer_view(&[9], None, 1);
            }));
        });

        queue.run_all(&mut doc);

        assert_eq!(&[9], doc.buffer_data());
    }

    #[test]
    fn failed_tasks_leave_records_at_defaults() {
        let mut doc = Document::new(OutputFormat::Glb);
        let image = doc.add_texture(crate::json::Texture::default());
        let mut queue = TaskQueue::default();

        queue.enqueue(TaskPriority::Texture, "encode missing source", {
            move |doc: &mut Document, _: &mut TaskQueue| {
                doc.messages.error("texture has no source data");
                let _ = image;
            }
        });
        queue.run_all(&mut doc);

        assert!(doc.messages.has_errors());
        assert!(doc.root.textures.get(image).source.is_none());
    }
}
