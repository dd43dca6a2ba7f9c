use serde::Serialize;

use crate::{
    builder::table::Index,
    json::{buffer::Accessor, scene::Node},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Interpolation {
    #[serde(rename = "LINEAR")]
    Linear,
    #[serde(rename = "STEP")]
    Step,
    #[serde(rename = "CUBICSPLINE")]
    CubicSpline,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelPath {
    Translation,
    Rotation,
    Scale,
    Weights,
}

#[derive(Clone, Copy, Serialize)]
pub struct ChannelTarget {
    pub node: Index<Node>,
    pub path: ChannelPath,
}

/// Keyframe input/output data for one channel.
#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSampler {
    pub input: Index<Accessor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
    pub output: Index<Accessor>,
}

#[derive(Clone, Copy, Serialize)]
pub struct Channel {
    /// Index into this animation's own sampler array, not a document table.
    pub sampler: Index<AnimationSampler>,
    pub target: ChannelTarget,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub channels: Vec<Channel>,
    pub samplers: Vec<AnimationSampler>,
}

impl Animation {
    /// Appends a sampler and returns its index for use in channels.
    pub fn add_sampler(&mut self, sampler: AnimationSampler) -> Index<AnimationSampler> {
        let index = Index::new(self.samplers.len() as u32);
        self.samplers.push(sampler);
        index
    }

    pub fn add_channel(&mut self, sampler: Index<AnimationSampler>, target: ChannelTarget) {
        self.channels.push(Channel { sampler, target });
    }
}
