pub trait Dot {
    fn dot(self, rhs: Self) -> f32;
}

pub fn dot<V: Dot>(v1: V, v2: V) -> f32 {
    v1.dot(v2)
}

/// Interpolates three values with barycentric weights: a * w[0] + b * w[1] + c * w[2].
pub fn barycentric<V>(a: V, b: V, c: V, w: [f32; 3]) -> V
where
    V: std::ops::Mul<f32, Output = V> + std::ops::Add<Output = V>,
{
    a * w[0] + b * w[1] + c * w[2]
}
