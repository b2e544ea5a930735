//! Clipping Region

/// Rectangle
///
/// Used for clip and lock regions.  `x1`,`y1` are inclusive and `x2`,`y2`
/// exclusive, so a rectangle with `x1 == x2` is empty.
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Rectangle<T: std::cmp::PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value, exclusive
    pub x2: T,
    /// Maximum y value, exclusive
    pub y2: T,
}

fn min<T: PartialOrd>(a: T, b: T) -> T { if a < b { a } else { b } }
fn max<T: PartialOrd>(a: T, b: T) -> T { if a > b { a } else { b } }

impl<T> Rectangle<T> where T: std::cmp::PartialOrd + Copy {
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2,x1) } else { (x1,x2) };
        let (y1, y2) = if y1 > y2 { (y2,y1) } else { (y1,y2) };
        Self { x1,y1,x2,y2 }
    }
    /// Return if the rectangle contains no points
    pub fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }
    /// Return if the point (x,y) lies inside
    pub fn contains(&self, x: T, y: T) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
    /// Return if the two rectangles share any point
    pub fn overlaps(&self, r: &Rectangle<T>) -> bool {
        !self.intersect(r).is_empty()
    }
    /// Return if `r` lies completely inside
    pub fn covers(&self, r: &Rectangle<T>) -> bool {
        r.x1 >= self.x1 && r.y1 >= self.y1 && r.x2 <= self.x2 && r.y2 <= self.y2
    }
    /// Common region of two rectangles
    ///
    /// The result may be empty, in which case it is not sorted
    pub fn intersect(&self, r: &Rectangle<T>) -> Rectangle<T> {
        Rectangle {
            x1: max(self.x1, r.x1),
            y1: max(self.y1, r.y1),
            x2: min(self.x2, r.x2),
            y2: min(self.y2, r.y2),
        }
    }
}

impl Rectangle<i32> {
    /// Rectangle from a position and size
    pub fn with_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x1: x, y1: y, x2: x + w, y2: y + h }
    }
    /// Width, zero if empty
    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }
    /// Height, zero if empty
    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }
    /// Move by (dx,dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self { x1: self.x1 + dx, y1: self.y1 + dy, x2: self.x2 + dx, y2: self.y2 + dy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn new_sorts() {
        let r = Rectangle::new(5, 9, 1, 2);
        assert_eq!(r, Rectangle { x1: 1, y1: 2, x2: 5, y2: 9 });
    }
    #[test]
    fn half_open() {
        let r = Rectangle::with_size(0, 0, 4, 3);
        assert!(r.contains(0, 0));
        assert!(r.contains(3, 2));
        assert!(!r.contains(4, 2));
        assert!(!r.contains(3, 3));
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 3);
    }
    #[test]
    fn intersection() {
        let a = Rectangle::with_size(0, 0, 10, 10);
        let b = Rectangle::with_size(5, 8, 10, 10);
        assert_eq!(a.intersect(&b), Rectangle { x1: 5, y1: 8, x2: 10, y2: 10 });
        assert!(a.overlaps(&b));
        let c = Rectangle::with_size(10, 0, 3, 3);
        assert!(!a.overlaps(&c));
        assert!(a.intersect(&c).is_empty());
        assert!(a.covers(&Rectangle::with_size(2, 2, 8, 8)));
        assert!(!a.covers(&b));
    }
}
