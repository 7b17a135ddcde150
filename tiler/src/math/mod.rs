// Component-wise arithmetic shared by all the vector types:
// -V, V + V, V - V, V * V, V * f32, f32 * V, V / f32, V += V
macro_rules! impl_vector_ops {
    ($t:ident { $($c:ident),+ }) => {
        impl std::ops::Neg for $t {
            type Output = $t;
            fn neg(self) -> $t {
                $t { $($c: -self.$c),+ }
            }
        }

        impl std::ops::Add for $t {
            type Output = $t;
            fn add(self, rhs: $t) -> $t {
                $t { $($c: self.$c + rhs.$c),+ }
            }
        }

        impl std::ops::Sub for $t {
            type Output = $t;
            fn sub(self, rhs: $t) -> $t {
                $t { $($c: self.$c - rhs.$c),+ }
            }
        }

        impl std::ops::Mul for $t {
            type Output = $t;
            fn mul(self, rhs: $t) -> $t {
                $t { $($c: self.$c * rhs.$c),+ }
            }
        }

        impl std::ops::Mul<f32> for $t {
            type Output = $t;
            fn mul(self, scalar: f32) -> $t {
                $t { $($c: self.$c * scalar),+ }
            }
        }

        impl std::ops::Mul<$t> for f32 {
            type Output = $t;
            fn mul(self, v: $t) -> $t {
                $t { $($c: v.$c * self),+ }
            }
        }

        impl std::ops::Div<f32> for $t {
            type Output = $t;
            fn div(self, scalar: f32) -> $t {
                $t { $($c: self.$c / scalar),+ }
            }
        }

        impl std::ops::AddAssign for $t {
            fn add_assign(&mut self, rhs: $t) {
                $(self.$c += rhs.$c;)+
            }
        }

        impl Dot for $t {
            fn dot(self, rhs: $t) -> f32 {
                0.0 $(+ self.$c * rhs.$c)+
            }
        }
    };
}

pub mod dot;
pub mod mat33;
pub mod mat44;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use dot::*;
pub use mat33::*;
pub use mat44::*;
pub use vec2::*;
pub use vec3::*;
pub use vec4::*;
